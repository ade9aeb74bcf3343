//! Authentication middleware and extractors
//!
//! Requests pass two stages before reaching a protected handler:
//! [`require_auth`] verifies the bearer token and attaches the caller as an
//! [`ActiveUser`] request extension, then [`require_roles`] checks the
//! caller's role against the route's [`RequiredRoles`].

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::MethodRouter,
};
use uuid::Uuid;

use crate::auth::guard::RequiredRoles;
use crate::auth::jwt::AccessClaims;
use crate::auth::models::UserRole;
use crate::auth::service::AuthenticationService;
use crate::error::Error;

/// The verified caller of the current request
#[derive(Debug, Clone)]
pub struct ActiveUser(pub AccessClaims);

impl ActiveUser {
    pub fn id(&self) -> Uuid {
        self.0.data.sub
    }

    pub fn email(&self) -> &str {
        &self.0.data.email
    }

    pub fn role(&self) -> UserRole {
        self.0.data.role
    }
}

impl<S> FromRequestParts<S> for ActiveUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ActiveUser>()
            .cloned()
            .ok_or(Error::Unauthorized)
    }
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware for requiring authentication
pub async fn require_auth(
    State(auth): State<Arc<AuthenticationService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let claims = {
        let token = bearer_token(req.headers()).ok_or(Error::Unauthorized)?;
        auth.verify_access_token(token)?
    };
    req.extensions_mut().insert(ActiveUser(claims));
    Ok(next.run(req).await)
}

/// Middleware enforcing a route's role declaration
pub async fn require_roles(
    State(required): State<RequiredRoles>,
    req: Request,
    next: Next,
) -> Result<Response, Error> {
    let role = req.extensions().get::<ActiveUser>().map(ActiveUser::role);
    if required.allows(role) {
        return Ok(next.run(req).await);
    }

    match role {
        None => Err(Error::Unauthorized),
        Some(role) => {
            tracing::debug!("Role {} not in {:?}", role, required.roles());
            Err(Error::Forbidden)
        }
    }
}

/// Restrict a route to the given roles
pub fn with_roles<S>(route: MethodRouter<S>, roles: &'static [UserRole]) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(from_fn_with_state(RequiredRoles::new(roles), require_roles))
}
