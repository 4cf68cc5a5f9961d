//! # Request Handlers
//!
//! Axum request handlers for the storefront API.
//! Bodies are parsed as `Result<Json<T>, JsonRejection>` so malformed JSON
//! comes back as a 400 with the shared error shape.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shop_auth::{hash_password, verify_password};
use shop_core::{
    CartItem, CheckoutReceipt, LoginUser, NewProduct, Product, ProductStore, RegisterUser,
    ShopError, UserStore,
};
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Checkout request body
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
}

type Body<T> = Result<Json<T>, JsonRejection>;

fn invalid_credentials() -> ApiError {
    ShopError::unauthenticated("invalid email or password").into()
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
#[instrument]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Register a new account
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    body: Body<RegisterUser>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = body?;
    request.validate()?;

    if state.store.get_user_by_email(&request.email).await?.is_some() {
        return Err(ShopError::invalid(format!(
            "user with email {} already exists",
            request.email
        ))
        .into());
    }

    let password = request.password.clone();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ShopError::Internal(format!("password hashing task failed: {e}")))??;

    let user = state.store.create_user(request.into_new_user(hash)).await?;
    info!(user_id = user.id, "user registered");

    Ok(StatusCode::CREATED)
}

/// Exchange credentials for a token
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    body: Body<LoginUser>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body?;
    request.validate()?;

    let Some(user) = state.store.get_user_by_email(&request.email).await? else {
        warn!("login for unknown email");
        return Err(invalid_credentials());
    };

    let stored = user.password.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&stored, &request.password))
        .await
        .map_err(|e| ShopError::Internal(format!("password check task failed: {e}")))??;

    if !matches {
        warn!(user_id = user.id, "login with wrong password");
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue_token(user.id)?;
    info!(user_id = user.id, "user logged in");

    Ok(Json(LoginResponse { token }))
}

/// List the whole catalog
#[instrument(skip_all)]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.store.list_products().await?))
}

/// Add a product to the catalog
#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Body<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(request) = body?;
    request.validate()?;

    let product = state.store.create_product(request).await?;
    info!(product_id = product.id, name = %product.name, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Turn the caller's cart into an order
#[instrument(skip(state, body))]
pub async fn checkout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Body<CheckoutRequest>,
) -> Result<Json<CheckoutReceipt>, ApiError> {
    let Json(request) = body?;

    let receipt = state.checkout.checkout(user_id, &request.items).await?;

    Ok(Json(receipt))
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorResponse;
    use crate::routes::create_router;
    use crate::state::test_state;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use shop_core::{MemoryStore, NewProduct, ProductStore};
    use std::sync::Arc;

    fn server() -> (TestServer, Arc<MemoryStore>) {
        let (state, store) = test_state();
        let server = TestServer::new(create_router(state)).unwrap();
        (server, store)
    }

    fn authorization(value: &str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(value).unwrap(),
        )
    }

    async fn register_and_login(server: &TestServer, email: &str) -> String {
        server
            .post("/register")
            .json(&json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": email,
                "password": "engine"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/login")
            .json(&json!({ "email": email, "password": "engine" }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (server, _) = server();
        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_register_validation_and_duplicates() {
        let (server, _) = server();

        let response = server
            .post("/register")
            .json(&json!({ "firstName": "A", "lastName": "B", "email": "nope", "password": "pw1" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<ErrorResponse>();
        assert!(body.error.starts_with("invalid payload"));
        assert_eq!(body.code, 400);

        register_and_login(&server, "ada@example.com").await;

        let response = server
            .post("/register")
            .json(&json!({
                "firstName": "Ada",
                "lastName": "Again",
                "email": "ada@example.com",
                "password": "engine"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "user with email ada@example.com already exists"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (server, _) = server();
        let response = server.post("/register").text("{not json").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorResponse>().code, 400);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (server, _) = server();
        register_and_login(&server, "grace@example.com").await;

        let wrong_password = server
            .post("/login")
            .json(&json!({ "email": "grace@example.com", "password": "cobol" }))
            .await;
        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            wrong_password.json::<ErrorResponse>().error,
            "invalid email or password"
        );

        let unknown = server
            .post("/login")
            .json(&json!({ "email": "nobody@example.com", "password": "engine" }))
            .await;
        unknown.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.json::<ErrorResponse>().error, "invalid email or password");

        let malformed = server
            .post("/login")
            .json(&json!({ "email": "grace", "password": "engine" }))
            .await;
        malformed.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_and_list_products() {
        let (server, _) = server();

        let response = server
            .post("/products")
            .json(&json!({ "name": "Mug", "description": "Stoneware", "price": 10.0, "quantity": 5 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created = response.json::<Value>();
        assert_eq!(created["id"], 1);
        assert_eq!(created["name"], "Mug");

        let invalid = server
            .post("/products")
            .json(&json!({ "name": "Broken", "price": -1.0, "quantity": 1 }))
            .await;
        invalid.assert_status(StatusCode::BAD_REQUEST);

        let listed = server.get("/products").await;
        listed.assert_status_ok();
        let products = listed.json::<Vec<Value>>();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["quantity"], 5);
    }

    #[tokio::test]
    async fn test_checkout_happy_path() {
        let (server, store) = server();
        store
            .create_product(NewProduct::new("Mug", 10.0, 5))
            .await
            .unwrap();
        let token = register_and_login(&server, "buyer@example.com").await;
        let (name, value) = authorization(&token);

        let response = server
            .post("/cart/checkout")
            .add_header(name, value)
            .json(&json!({ "items": [{ "productId": 1, "quantity": 2 }] }))
            .await;
        response.assert_status_ok();

        let receipt = response.json::<Value>();
        assert_eq!(receipt["totalPrice"], 20.0);
        let order_id = receipt["orderId"].as_i64().unwrap();

        let remaining = store.get_products_by_ids(&[1]).await.unwrap();
        assert_eq!(remaining[0].quantity, 3);
        assert_eq!(store.order_items(order_id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_accepts_bearer_prefix() {
        let (server, store) = server();
        store
            .create_product(NewProduct::new("Pen", 2.5, 10))
            .await
            .unwrap();
        let token = register_and_login(&server, "bearer@example.com").await;
        let (name, value) = authorization(&format!("Bearer {token}"));

        let response = server
            .post("/cart/checkout")
            .add_header(name, value)
            .json(&json!({ "items": [{ "productId": 1, "quantity": 4 }] }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["totalPrice"], 10.0);
    }

    #[tokio::test]
    async fn test_checkout_requires_valid_token() {
        let (server, _) = server();
        let cart = json!({ "items": [{ "productId": 1, "quantity": 1 }] });

        let missing = server.post("/cart/checkout").json(&cart).await;
        missing.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(missing.json::<ErrorResponse>().error, "missing token");

        let (name, value) = authorization("not.a.token");
        let garbage = server
            .post("/cart/checkout")
            .add_header(name, value)
            .json(&cart)
            .await;
        garbage.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(garbage.json::<ErrorResponse>().error, "permission denied");
    }

    #[tokio::test]
    async fn test_checkout_rejects_token_for_deleted_user() {
        let (state, _store) = test_state();
        let token = state.tokens.issue_token(42).unwrap();
        let server = TestServer::new(create_router(state)).unwrap();
        let (name, value) = authorization(&token);

        let response = server
            .post("/cart/checkout")
            .add_header(name, value)
            .json(&json!({ "items": [{ "productId": 1, "quantity": 1 }] }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_checkout_cart_errors() {
        let (server, store) = server();
        store
            .create_product(NewProduct::new("Lamp", 30.0, 1))
            .await
            .unwrap();
        let token = register_and_login(&server, "cart@example.com").await;

        let cases = [
            (json!({ "items": [] }), StatusCode::BAD_REQUEST, "cart is empty"),
            (
                json!({ "items": [{ "productId": 1, "quantity": 0 }] }),
                StatusCode::BAD_REQUEST,
                "invalid quantity for product ID 1",
            ),
            (
                json!({ "items": [{ "productId": 99, "quantity": 1 }] }),
                StatusCode::NOT_FOUND,
                "product ID 99 not found",
            ),
            (
                json!({ "items": [{ "productId": 1, "quantity": 2 }] }),
                StatusCode::BAD_REQUEST,
                "insufficient stock for product Lamp",
            ),
        ];

        for (cart, status, message) in cases {
            let (name, value) = authorization(&token);
            let response = server
                .post("/cart/checkout")
                .add_header(name, value)
                .json(&cart)
                .await;
            response.assert_status(status);
            assert_eq!(response.json::<ErrorResponse>().error, message);
        }

        let (name, value) = authorization(&token);
        let malformed = server
            .post("/cart/checkout")
            .add_header(name, value)
            .json(&json!({ "items": "everything" }))
            .await;
        malformed.assert_status(StatusCode::BAD_REQUEST);

        let untouched = store.get_products_by_ids(&[1]).await.unwrap();
        assert_eq!(untouched[0].quantity, 1);
        assert!(store.orders().await.is_empty());
    }
}
