//! # User Types
//!
//! Account records and the registration/login payloads that create them.

use crate::error::{ShopError, ShopResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 3;
pub const MAX_PASSWORD_LEN: usize = 130;

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC hash, never the plain password
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// A user ready to be inserted (password already hashed)
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_user(self, id: i64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password_hash,
            created_at,
        }
    }
}

/// `POST /register` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterUser {
    pub fn validate(&self) -> ShopResult<()> {
        let mut problems = Vec::new();

        if self.first_name.trim().is_empty() {
            problems.push("firstName is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            problems.push("lastName is required".to_string());
        }
        if !is_valid_email(&self.email) {
            problems.push("email must be a valid address".to_string());
        }
        let len = self.password.chars().count();
        if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
            problems.push(format!(
                "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ShopError::invalid(format!(
                "invalid payload: {}",
                problems.join("; ")
            )))
        }
    }

    /// Pair the profile fields with an already hashed password
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash,
        }
    }
}

/// `POST /login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginUser {
    pub fn validate(&self) -> ShopResult<()> {
        if !is_valid_email(&self.email) {
            return Err(ShopError::invalid("invalid payload: email must be a valid address"));
        }
        if self.password.is_empty() {
            return Err(ShopError::invalid("invalid payload: password is required"));
        }
        Ok(())
    }
}

/// Shape check for `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("valid@gmail.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("us er@example.com"));
    }

    #[test]
    fn test_registration_validation() {
        assert!(registration("valid@gmail.com", "123").validate().is_ok());
        assert!(registration("invalid", "123").validate().is_err());
        assert!(registration("valid@gmail.com", "12").validate().is_err());
        assert!(registration("valid@gmail.com", &"x".repeat(131)).validate().is_err());

        let mut missing_name = registration("valid@gmail.com", "secret");
        missing_name.first_name.clear();
        let err = missing_name.validate().unwrap_err();
        assert!(err.to_string().contains("firstName"));
    }

    #[test]
    fn test_password_never_serialized() {
        let user = registration("valid@gmail.com", "123")
            .into_new_user("$argon2id$hash".into())
            .into_user(1, Utc::now());
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "valid@gmail.com");
    }

    #[test]
    fn test_login_validation() {
        let login = LoginUser {
            email: "valid@gmail.com".into(),
            password: String::new(),
        };
        assert!(login.validate().is_err());
    }
}
