//! Error types for lms-iam

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::routes::ApiResponse;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'lms-iam init' first.")]
    ConfigNotFound,

    #[error("Email is already in use")]
    DuplicateAccount,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Refresh session is no longer valid")]
    SessionInvalid,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Session registry error: {0}")]
    Registry(#[from] redis::RedisError),

    #[error("Identity store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl Error {
    /// HTTP status the error surfaces as.
    ///
    /// Every authentication failure collapses to 401 so callers cannot tell
    /// a missing account from a wrong password or a replayed token.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::DuplicateAccount
            | Error::InvalidCredentials
            | Error::InvalidToken(_)
            | Error::SessionInvalid
            | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client.
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "Unauthorized".to_string(),
            StatusCode::FORBIDDEN => "Forbidden".to_string(),
            StatusCode::BAD_REQUEST => self.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(ApiResponse::<()>::err(self.public_message()))).into_response()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Other(format!("Background task failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_are_undifferentiated() {
        for err in [
            Error::DuplicateAccount,
            Error::InvalidCredentials,
            Error::SessionInvalid,
            Error::Unauthorized,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.public_message(), "Unauthorized");
        }
    }

    #[test]
    fn test_forbidden_is_distinct() {
        assert_eq!(Error::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = Error::Store("connection reset by peer".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("connection"));
    }
}
