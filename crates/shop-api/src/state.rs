//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the store, checkout orchestrator, token service, and configuration.

use shop_auth::{AuthConfig, TokenService};
use shop_core::{CheckoutService, SharedStore, ShopError, ShopStore, WriteMode};
use shop_db::DbConfig;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Checkout write path
    pub write_mode: WriteMode,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
    /// Token settings
    pub auth: AuthConfig,
    /// Database settings
    pub db: DbConfig,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok();

        let var = |key: &str| std::env::var(key).ok();

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ShopError::Configuration(format!("invalid PORT '{raw}'")))?,
            None => 8080,
        };

        let write_mode = match var("CHECKOUT_WRITE_MODE") {
            Some(raw) => raw.parse()?,
            None => WriteMode::default(),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            write_mode,
            run_migrations: flag(var("RUN_MIGRATIONS")),
            auth: AuthConfig::from_env()?,
            db: DbConfig::from_env()?,
        })
    }

    /// Config with defaults around explicit auth and db settings
    pub fn new(auth: AuthConfig, db: DbConfig) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            write_mode: WriteMode::default(),
            run_migrations: false,
            auth,
            db,
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ShopError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ShopError::Configuration(format!(
                    "invalid listen address {}:{}: {e}",
                    self.host, self.port
                ))
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Whether `LOG_FORMAT=json` is set. Read before the rest of the config so
/// logging is up while config warnings are emitted.
pub fn json_logs_from_env() -> bool {
    wants_json_logs(std::env::var("LOG_FORMAT").ok().as_deref())
}

fn wants_json_logs(log_format: Option<&str>) -> bool {
    log_format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}

fn flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes")
    )
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product, order, and user persistence
    pub store: SharedStore,
    /// Checkout orchestrator
    pub checkout: CheckoutService,
    /// Bearer token issuer/verifier
    pub tokens: TokenService,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the services around one storage backend
    pub fn new<S>(config: AppConfig, store: Arc<S>) -> Self
    where
        S: ShopStore + 'static,
    {
        let checkout = CheckoutService::new(store.clone()).with_mode(config.write_mode);
        let tokens = TokenService::new(config.auth.clone());

        Self {
            store,
            checkout,
            tokens,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> (AppState, Arc<shop_core::MemoryStore>) {
    let store = Arc::new(shop_core::MemoryStore::new());
    let config = AppConfig::new(
        AuthConfig::new("test-secret", 3600),
        DbConfig::new("postgres://localhost/unused"),
    );
    (AppState::new(config, store.clone()), store)
}
