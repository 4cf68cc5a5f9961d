//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - POST /register - Create an account
/// - POST /login - Exchange credentials for a token
/// - GET  /products - List the catalog
/// - POST /products - Add a product
/// - POST /cart/checkout - Check out a cart (token required)
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let account_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let catalog_routes = Router::new().route(
        "/products",
        get(handlers::list_products).post(handlers::create_product),
    );

    let cart_routes = Router::new().route("/checkout", post(handlers::checkout));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(account_routes)
        .merge(catalog_routes)
        .nest("/cart", cart_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
