//! API route handlers

use axum::{
    extract::{FromRequest, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::server::SharedState;
use crate::auth::{ActiveUser, Credentials, RefreshTokenRequest, TokenPair};
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// JSON request body. Malformed bodies are rejected as [`Error::Validation`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// Verified claims exposed to the caller
#[derive(Debug, Serialize)]
pub struct ActiveUserInfo {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl From<ActiveUser> for ActiveUserInfo {
    fn from(user: ActiveUser) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            role: user.role().to_string(),
        }
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Authentication routes

pub async fn sign_up(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<Credentials>,
) -> Result<impl IntoResponse> {
    req.validate()?;
    state.auth.sign_up(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("registered"))))
}

pub async fn sign_in(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<Credentials>,
) -> Result<Json<ApiResponse<TokenPair>>> {
    let pair = state.auth.sign_in(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(pair)))
}

pub async fn refresh_tokens(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<TokenPair>>> {
    let pair = state.auth.refresh_tokens(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(pair)))
}

pub async fn sign_out(
    State(state): State<SharedState>,
    user: ActiveUser,
) -> Result<Json<ApiResponse<&'static str>>> {
    state.auth.invalidate_session(user.id()).await?;
    Ok(Json(ApiResponse::ok("signed out")))
}

// Session routes

pub async fn me(user: ActiveUser) -> Json<ApiResponse<ActiveUserInfo>> {
    Json(ApiResponse::ok(user.into()))
}

pub async fn revoke_session(
    State(state): State<SharedState>,
    admin: ActiveUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>> {
    tracing::info!("Admin {} revoking session of user {}", admin.id(), user_id);
    state.auth.invalidate_session(user_id).await?;
    Ok(Json(ApiResponse::ok("revoked")))
}
