//! HTTP API server

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{
    require_auth, with_roles, AuthenticationService, InMemorySessionRegistry, PasswordHasher,
    RedisSessionRegistry, SessionRegistry, TokenIssuer, UserRole,
};
use crate::config::{Config, RegistryBackend};
use crate::error::{Error, Result};
use crate::store::InMemoryIdentityStore;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub auth: Arc<AuthenticationService>,
}

pub type SharedState = Arc<AppState>;

/// Wire the stores, registry and service described by the configuration
pub async fn build_state(config: Config) -> Result<SharedState> {
    let tokens = TokenIssuer::new(&config.jwt);
    let hasher = PasswordHasher::new(config.hashing.cost)?;

    let sessions: Arc<dyn SessionRegistry> = match config.session.backend {
        RegistryBackend::Memory => {
            tracing::warn!("Using in-memory session registry; sessions are lost on restart");
            Arc::new(InMemorySessionRegistry::new(config.jwt.refresh_token_ttl))
        }
        RegistryBackend::Redis => {
            let url = config
                .session
                .redis_url
                .as_deref()
                .ok_or_else(|| Error::Config("session.redis_url is not set".to_string()))?;
            Arc::new(RedisSessionRegistry::connect(url, config.jwt.refresh_token_ttl).await?)
        }
    };

    let auth = AuthenticationService::new(
        Arc::new(InMemoryIdentityStore::new()),
        sessions,
        hasher,
        tokens,
    )
    .with_revoke_on_reuse(config.session.revoke_on_reuse);

    for seed in &config.seed {
        auth.seed_user(seed).await?;
    }

    Ok(Arc::new(AppState {
        config,
        auth: Arc::new(auth),
    }))
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    config.validate()?;
    let state = build_state(config).await?;

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    create_router_with(state, Router::new())
}

/// Create the router, mounting `protected` behind authentication.
///
/// Routes in `protected` can narrow access further with [`with_roles`].
pub fn create_router_with(state: SharedState, protected: Router<SharedState>) -> Router {
    let protected = Router::new()
        .route("/authentication/sign-out", post(routes::sign_out))
        .route("/api/me", get(routes::me))
        .route(
            "/api/sessions/{user_id}",
            with_roles(delete(routes::revoke_session), &[UserRole::Admin]),
        )
        .merge(protected)
        .route_layer(from_fn_with_state(state.auth.clone(), require_auth));

    Router::new()
        // Public routes
        .route("/api/health", get(routes::health))
        .route("/authentication/sign-up", post(routes::sign_up))
        .route("/authentication/sign-in", post(routes::sign_in))
        .route("/authentication/refresh-tokens", post(routes::refresh_tokens))
        .merge(protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
