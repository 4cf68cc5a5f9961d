//! # Bearer Tokens
//!
//! Issues and verifies HS256 JSON Web Tokens.
//!
//! A token is `base64url(header).base64url(claims).base64url(signature)`
//! with the header fixed to `{"alg":"HS256","typ":"JWT"}` and claims of the
//! form `{"userID":"42","expiredAt":1735689600}`. The signature is
//! HMAC-SHA256 over the first two segments.

use crate::config::AuthConfig;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use shop_core::{ShopError, ShopResult};
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userID")]
    user_id: String,
    #[serde(rename = "expiredAt")]
    expired_at: i64,
}

/// Issues and authenticates bearer tokens with a shared secret
#[derive(Debug, Clone)]
pub struct TokenService {
    config: AuthConfig,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issue a token for `user_id`, valid for the configured window
    pub fn issue_token(&self, user_id: i64) -> ShopResult<String> {
        self.issue_token_at(user_id, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (unix seconds)
    pub fn issue_token_at(&self, user_id: i64, now: i64) -> ShopResult<String> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: Some("JWT".to_string()),
        };
        let expired_at = now.checked_add(self.config.expiration_seconds).ok_or_else(|| {
            ShopError::Configuration(format!(
                "token lifetime of {}s overflows the expiry timestamp",
                self.config.expiration_seconds
            ))
        })?;
        let claims = Claims {
            user_id: user_id.to_string(),
            expired_at,
        };
        self.sign(&header, &claims)
    }

    /// Verify `token` and return the user id it was issued for
    pub fn authenticate(&self, token: &str) -> ShopResult<i64> {
        self.authenticate_at(token, Utc::now().timestamp())
    }

    /// Verify `token` as if the current time were `now` (unix seconds)
    pub fn authenticate_at(&self, token: &str, now: i64) -> ShopResult<i64> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ShopError::unauthenticated("missing token"));
        }

        let mut segments = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(rejected("token does not have three segments"));
        };

        let header: Header = decode_segment(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(rejected(format!("unexpected signing method {}", header.alg)));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| rejected("signature is not base64url"))?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| rejected("signature mismatch"))?;

        let claims: Claims = decode_segment(claims_b64)?;
        if now >= claims.expired_at {
            return Err(rejected("token expired"));
        }

        claims
            .user_id
            .parse::<i64>()
            .map_err(|_| rejected("userID claim is not numeric"))
    }

    fn sign(&self, header: &Header, claims: &Claims) -> ShopResult<String> {
        let header_b64 = encode_segment(header)?;
        let claims_b64 = encode_segment(claims)?;
        let signing_input = format!("{header_b64}.{claims_b64}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    fn mac(&self) -> ShopResult<HmacSha256> {
        HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|e| ShopError::Internal(format!("HMAC key rejected: {e}")))
    }
}

fn rejected(reason: impl AsRef<str>) -> ShopError {
    debug!(reason = reason.as_ref(), "token rejected");
    ShopError::unauthenticated("permission denied")
}

fn encode_segment<T: Serialize>(value: &T) -> ShopResult<String> {
    let json = serde_json::to_vec(value)
        .map_err(|e| ShopError::Internal(format!("token serialization failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> ShopResult<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| rejected("segment is not base64url"))?;
    serde_json::from_slice(&bytes).map_err(|_| rejected("segment is not the expected JSON"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn service() -> TokenService {
        TokenService::new(AuthConfig::new("test-secret", 3600))
    }

    #[test]
    fn test_round_trip() {
        let tokens = service();
        let token = tokens.issue_token_at(42, NOW).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(tokens.authenticate_at(&token, NOW + 10).unwrap(), 42);
    }

    #[test]
    fn test_overflowing_lifetime_is_an_error() {
        let tokens = TokenService::new(AuthConfig::new("test-secret", i64::MAX));

        let err = tokens.issue_token_at(1, NOW).unwrap_err();
        assert!(matches!(err, ShopError::Configuration(_)));
    }

    #[test]
    fn test_round_trip_with_real_clock() {
        let tokens = service();
        let token = tokens.issue_token(7).unwrap();
        assert_eq!(tokens.authenticate(&token).unwrap(), 7);
    }

    #[test]
    fn test_expired_token() {
        let tokens = service();
        let token = tokens.issue_token_at(42, NOW).unwrap();

        assert!(tokens.authenticate_at(&token, NOW + 3599).is_ok());
        let err = tokens.authenticate_at(&token, NOW + 3600).unwrap_err();
        assert!(matches!(err, ShopError::Unauthenticated(_)));
    }

    #[test]
    fn test_other_signing_scheme_rejected() {
        let tokens = service();
        let header = Header {
            alg: "HS512".to_string(),
            typ: Some("JWT".to_string()),
        };
        let claims = Claims {
            user_id: "42".to_string(),
            expired_at: NOW + 3600,
        };
        let token = tokens.sign(&header, &claims).unwrap();

        let err = tokens.authenticate_at(&token, NOW).unwrap_err();
        assert!(matches!(err, ShopError::Unauthenticated(_)));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let claims = URL_SAFE_NO_PAD.encode(br#"{"userID":"1","expiredAt":9999999999}"#);
        let token = format!("{header}.{claims}.");

        assert!(service().authenticate_at(&token, NOW).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue_token_at(42, NOW).unwrap();
        let other = TokenService::new(AuthConfig::new("another-secret", 3600));

        assert!(other.authenticate_at(&token, NOW).is_err());
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let tokens = service();
        let token = tokens.issue_token_at(42, NOW).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(br#"{"userID":"1","expiredAt":9999999999}"#);
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert!(tokens.authenticate_at(&forged, NOW).is_err());
    }

    #[test]
    fn test_malformed_tokens() {
        let tokens = service();
        for token in ["", "   ", "abc", "a.b", "a.b.c.d", "!!.??.##"] {
            let err = tokens.authenticate_at(token, NOW).unwrap_err();
            assert!(matches!(err, ShopError::Unauthenticated(_)), "{token:?}");
        }
    }
}
