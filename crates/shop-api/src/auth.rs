//! # Authenticated Caller
//!
//! Extractor that resolves the `Authorization` header to a known user.
//! The header carries the bare token; a `Bearer ` prefix is accepted too.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use shop_core::{ShopError, UserStore};
use tracing::debug;

/// ID of the user who signed the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let raw = match parts.headers.get(AUTHORIZATION) {
            Some(value) => value
                .to_str()
                .map_err(|_| ShopError::unauthenticated("permission denied"))?,
            None => "",
        };

        let user_id = state.tokens.authenticate(token_from_header(raw))?;

        match state.store.get_user_by_id(user_id).await? {
            Some(user) => Ok(AuthUser(user.id)),
            None => {
                debug!(user_id, "token for unknown user");
                Err(ShopError::unauthenticated("permission denied").into())
            }
        }
    }
}

fn token_from_header(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix("Bearer ").map(str::trim).unwrap_or(raw)
}
