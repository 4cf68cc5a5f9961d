//! # shop-db
//!
//! PostgreSQL backend for storefront-rs.
//!
//! [`PgStore`] implements every `shop-core` store trait over a `sqlx`
//! connection pool. Queries are checked at runtime so the crate builds
//! without a live database.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_db::{migrate, DbConfig, PgStore};
//!
//! let store = PgStore::connect(&DbConfig::from_env()?).await?;
//! migrate::up(store.pool()).await?;
//! ```
//!
//! ## Schema
//!
//! Reversible migrations live in `migrations/` and are embedded at build
//! time. `shop-migrate up` applies pending ones, `shop-migrate down`
//! reverts all of them.

pub mod config;
pub mod migrate;
mod orders;
mod products;
mod store;
mod users;

// Re-exports
pub use config::DbConfig;
pub use store::PgStore;
