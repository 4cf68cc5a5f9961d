//! # Shop Error Types
//!
//! Typed error handling for the storefront backend.
//! Every store, auth, and checkout operation returns `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all storefront operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShopError {
    /// Malformed or semantically invalid request
    #[error("{0}")]
    InvalidArgument(String),

    /// Missing, invalid, or expired credential
    #[error("{0}")]
    Unauthenticated(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Not enough stock to satisfy a cart line
    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: String },

    /// Data store failure
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration errors (missing keys, invalid values)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ShopError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ShopError::InvalidArgument(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        ShopError::Unauthenticated(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ShopError::NotFound(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        ShopError::Persistence(msg.into())
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::InvalidArgument(_) => 400,
            ShopError::Unauthenticated(_) => 401,
            ShopError::NotFound(_) => 404,
            ShopError::InsufficientStock { .. } => 400,
            ShopError::Persistence(_) => 500,
            ShopError::Configuration(_) => 500,
            ShopError::Internal(_) => 500,
        }
    }

    /// Whether the message may be shown to API callers verbatim.
    ///
    /// Server-side failures carry storage or config detail that only
    /// belongs in logs.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
