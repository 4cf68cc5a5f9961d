//! # shop-api
//!
//! HTTP API layer for the storefront backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for accounts, products, and checkout
//! - Token-authenticated caller extraction
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/register` | Create an account |
//! | POST | `/login` | Issue a token |
//! | GET | `/products` | List products |
//! | POST | `/products` | Create product |
//! | POST | `/cart/checkout` | Check out a cart |

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
