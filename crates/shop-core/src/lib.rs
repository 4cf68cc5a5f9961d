//! # shop-core
//!
//! Core types and traits for the storefront backend.
//!
//! This crate provides:
//! - `Product`, `Order`, `OrderItem`, `CartItem`, and `User` domain types
//! - `ProductStore`, `OrderStore`, `UserStore`, and `CheckoutStore` traits
//! - `CheckoutService`, which turns a cart into a persisted order
//! - `MemoryStore`, an in-process backend implementing every store trait
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CartItem, CheckoutService, MemoryStore, NewProduct, ProductStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.create_product(NewProduct::new("Mug", 10.0, 5)).await?;
//!
//! let checkout = CheckoutService::new(store.clone());
//! let receipt = checkout.checkout(user_id, &[CartItem::new(1, 2)]).await?;
//! assert_eq!(receipt.total_price, 20.0);
//! ```

pub mod checkout;
pub mod error;
pub mod memory;
pub mod order;
pub mod product;
pub mod store;
pub mod user;

// Re-exports for convenience
pub use checkout::{CheckoutService, WriteMode};
pub use error::{ShopError, ShopResult};
pub use memory::MemoryStore;
pub use order::{
    CartItem, CheckoutReceipt, NewOrder, Order, OrderItem, OrderLine, OrderStatus,
    PLACEHOLDER_ADDRESS,
};
pub use product::{NewProduct, Product};
pub use store::{CheckoutStore, OrderStore, ProductStore, SharedStore, ShopStore, UserStore};
pub use user::{LoginUser, NewUser, RegisterUser, User};
