//! # Auth Configuration
//!
//! Token signing settings, loaded from environment variables.

use shop_core::ShopError;
use std::env;

/// Secret used when `JWT_SECRET` is unset outside production
pub const DEVELOPMENT_SECRET: &str = "storefront-development-secret";

/// Default token lifetime: one week
pub const DEFAULT_EXPIRATION_SECONDS: i64 = 3600 * 24 * 7;

/// Longest accepted token lifetime: ten years
pub const MAX_EXPIRATION_SECONDS: i64 = 3600 * 24 * 365 * 10;

/// Token signing configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing secret
    pub secret: String,

    /// How long an issued token stays valid
    pub expiration_seconds: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_seconds", &self.expiration_seconds)
            .finish()
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// - `JWT_SECRET` (required when `ENVIRONMENT=production`)
    /// - `JWT_EXPIRATION_SECONDS` (default one week)
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ShopError> {
        let production = lookup("ENVIRONMENT").as_deref() == Some("production");

        let secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if production => {
                return Err(ShopError::Configuration(
                    "JWT_SECRET must be set in production".to_string(),
                ))
            }
            None => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEVELOPMENT_SECRET.to_string()
            }
        };

        let expiration_seconds = match lookup("JWT_EXPIRATION_SECONDS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|s| (1..=MAX_EXPIRATION_SECONDS).contains(s))
                .ok_or_else(|| {
                    ShopError::Configuration(format!(
                        "JWT_EXPIRATION_SECONDS must be between 1 and {MAX_EXPIRATION_SECONDS}, got '{raw}'"
                    ))
                })?,
            None => DEFAULT_EXPIRATION_SECONDS,
        };

        Ok(Self {
            secret,
            expiration_seconds,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(secret: impl Into<String>, expiration_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_seconds,
        }
    }
}
