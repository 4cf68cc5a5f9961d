//! # Store Traits
//!
//! Persistence seams for the storefront. Handlers and the checkout
//! orchestrator only ever see these traits; backends plug in behind them.
//!
//! ```text
//! ┌──────────────┐ ┌────────────┐ ┌───────────┐ ┌───────────────┐
//! │ ProductStore │ │ OrderStore │ │ UserStore │ │ CheckoutStore │
//! └──────┬───────┘ └─────┬──────┘ └─────┬─────┘ └───────┬───────┘
//!        └───────────────┴──────┬───────┴───────────────┘
//!                ┌──────────────┴──────────────┐
//!                │                             │
//!        ┌───────┴───────┐             ┌───────┴───────┐
//!        │  MemoryStore  │             │    PgStore    │
//!        │  (shop-core)  │             │   (shop-db)   │
//!        └───────────────┘             └───────────────┘
//! ```

use crate::error::ShopResult;
use crate::order::{NewOrder, OrderItem, OrderLine};
use crate::product::{NewProduct, Product};
use crate::user::{NewUser, User};
use async_trait::async_trait;
use std::sync::Arc;

/// Catalog access
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, order unspecified
    async fn list_products(&self) -> ShopResult<Vec<Product>>;

    /// Insert a product and return the stored row
    async fn create_product(&self, product: NewProduct) -> ShopResult<Product>;

    /// Products whose id is in `ids`.
    ///
    /// Fails with `InvalidArgument` when `ids` is empty. Missing ids are
    /// silently absent from the result; callers must detect them.
    async fn get_products_by_ids(&self, ids: &[i64]) -> ShopResult<Vec<Product>>;

    /// Unconditionally set a product's stock.
    ///
    /// Fails with `Persistence` if the product does not exist.
    async fn update_product_quantity(&self, id: i64, quantity: i32) -> ShopResult<()>;
}

/// Order persistence, one statement per call
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order and return its generated id
    async fn create_order(&self, order: NewOrder) -> ShopResult<i64>;

    /// Insert one line item for an existing order
    async fn create_order_item(&self, item: OrderItem) -> ShopResult<()>;
}

/// Account persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> ShopResult<Option<User>>;

    async fn get_user_by_id(&self, id: i64) -> ShopResult<Option<User>>;

    /// Insert a user. A duplicate email is an `InvalidArgument`.
    async fn create_user(&self, user: NewUser) -> ShopResult<User>;
}

/// Atomic checkout write path.
///
/// Implementations decrement stock with `quantity = quantity - n WHERE
/// quantity >= n` for every line, insert the order and its items, and
/// either apply everything or nothing. A line whose decrement matches no
/// row fails the whole call with `InsufficientStock`.
#[async_trait]
pub trait CheckoutStore: ProductStore + OrderStore {
    async fn commit_checkout(&self, order: NewOrder, lines: &[OrderLine]) -> ShopResult<i64>;
}

/// Every trait a storefront backend provides
pub trait ShopStore: CheckoutStore + UserStore {}

impl<T> ShopStore for T where T: CheckoutStore + UserStore {}

/// Shared, dynamically dispatched backend
pub type SharedStore = Arc<dyn ShopStore>;
