//! # shop-auth
//!
//! Credential handling for storefront-rs.
//!
//! - **TokenService** issues signed, time-limited bearer tokens and maps a
//!   presented token back to a user id. Stateless: verification only needs
//!   the configured secret.
//! - **password** hashes and verifies account passwords with Argon2id.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_auth::{AuthConfig, TokenService};
//!
//! let tokens = TokenService::new(AuthConfig::from_env()?);
//! let token = tokens.issue_token(user.id)?;
//!
//! // Later, on an authenticated request:
//! let user_id = tokens.authenticate(&token)?;
//! ```

pub mod config;
pub mod password;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use password::{hash_password, verify_password};
pub use token::TokenService;
