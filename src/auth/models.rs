//! Authentication models

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::Error;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Student - default role given at sign-up
    Student,
    /// Instructor - publishes and manages courses
    Instructor,
    /// Administrator - full access
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => write!(f, "STUDENT"),
            UserRole::Instructor => write!(f, "INSTRUCTOR"),
            UserRole::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STUDENT" => Ok(UserRole::Student),
            "INSTRUCTOR" => Ok(UserRole::Instructor),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(Error::Validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// A registered identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Unique email used for sign-in
    pub email: String,
    /// Display name
    pub name: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User's role
    pub role: UserRole,
    /// When the account was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Create a new user
    pub fn new(email: String, name: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            role,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Sign-up and sign-in credentials
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Check field shapes before they reach the service
    pub fn validate(&self) -> crate::error::Result<()> {
        if !is_valid_email(&self.email) {
            return Err(Error::Validation("email must be a valid email address".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .expect("Invalid regex pattern - this is a bug in the codebase")
});

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Refresh request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Access and refresh token returned on sign-in and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&UserRole::Instructor).unwrap(), "\"INSTRUCTOR\"");
        let role: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("student".parse::<UserRole>().unwrap(), UserRole::Student);
        assert!("moderator".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "a@example.com".to_string(),
            "a@example.com".to_string(),
            "$2b$04$secret".to_string(),
            UserRole::Student,
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_credentials_validation() {
        let ok = Credentials {
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = Credentials {
            email: "alice".to_string(),
            password: "secret1".to_string(),
        };
        assert!(matches!(bad_email.validate(), Err(Error::Validation(_))));

        let short = Credentials {
            email: "alice@example.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(matches!(short.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_token_pair_is_camel_case() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
    }
}
