//! Authentication service
//!
//! Orchestrates sign-up, sign-in and refresh-token rotation. The service
//! holds no state of its own: identities live in the [`IdentityStore`] and
//! live refresh sessions in the [`SessionRegistry`].

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::jwt::{AccessClaims, AccessTokenData, RefreshTokenData, TokenIssuer};
use crate::auth::models::{TokenPair, User, UserRole};
use crate::auth::password::PasswordHasher;
use crate::auth::session::SessionRegistry;
use crate::config::SeedUser;
use crate::error::{Error, Result};
use crate::store::IdentityStore;

pub struct AuthenticationService {
    users: Arc<dyn IdentityStore>,
    sessions: Arc<dyn SessionRegistry>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    revoke_on_reuse: bool,
    /// Hash verified when sign-in names an unknown email
    decoy_hash: OnceCell<String>,
}

const DECOY_PASSWORD: &str = "lms-iam-decoy-password";

impl AuthenticationService {
    pub fn new(
        users: Arc<dyn IdentityStore>,
        sessions: Arc<dyn SessionRegistry>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            tokens,
            revoke_on_reuse: false,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Invalidate the live session when a stale or forged refresh token is presented
    pub fn with_revoke_on_reuse(mut self, revoke_on_reuse: bool) -> Self {
        self.revoke_on_reuse = revoke_on_reuse;
        self
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new STUDENT account. No tokens are issued.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(Error::DuplicateAccount);
        }

        let hasher = self.hasher;
        let plaintext = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await??;

        let user = self
            .users
            .create(email, email, &password_hash, UserRole::Student)
            .await?;
        info!("Registered user {}", user.id);
        Ok(())
    }

    /// Check credentials and start a new refresh session.
    ///
    /// An unknown email and a wrong password fail the same way, and both
    /// pay for one bcrypt verification.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenPair> {
        let user = self.users.find_by_email(email).await?;
        let stored = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.decoy_hash().await?.to_owned(),
        };

        let matches = self.verify_password(password, stored).await?;
        let Some(user) = user.filter(|_| matches) else {
            return Err(Error::InvalidCredentials);
        };

        let pair = self.make_tokens(&user).await?;
        info!("User {} signed in", user.id);
        Ok(pair)
    }

    async fn verify_password(&self, password: &str, stored: String) -> Result<bool> {
        let hasher = self.hasher;
        let plaintext = password.to_owned();
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &stored)).await?)
    }

    /// Hash of a fixed password at the configured cost, computed on first use
    async fn decoy_hash(&self) -> Result<&str> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| async {
                let hasher = self.hasher;
                tokio::task::spawn_blocking(move || hasher.hash(DECOY_PASSWORD)).await?
            })
            .await?;
        Ok(hash.as_str())
    }

    /// Redeem a refresh token for a new pair. The redeemed token becomes unusable.
    ///
    /// Every failure is reported as `Error::Unauthorized`.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair> {
        self.rotate(refresh_token).await.map_err(|e| {
            match &e {
                Error::InvalidToken(_)
                | Error::SessionInvalid
                | Error::Unauthorized => debug!("Refresh rejected: {}", e),
                _ => warn!("Refresh failed: {}", e),
            }
            Error::Unauthorized
        })
    }

    async fn rotate(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self.tokens.verify_refresh(refresh_token)?;
        let user = self
            .users
            .find_by_id(claims.data.sub)
            .await?
            .ok_or(Error::Unauthorized)?;

        if !self
            .sessions
            .consume(user.id, &claims.data.refresh_token_id)
            .await?
        {
            if self.revoke_on_reuse {
                warn!("Stale refresh token presented for user {}, revoking session", user.id);
                self.sessions.invalidate(user.id).await?;
            }
            return Err(Error::SessionInvalid);
        }

        let pair = self.make_tokens(&user).await?;
        debug!("Rotated refresh session for user {}", user.id);
        Ok(pair)
    }

    /// Issue an access/refresh pair and register the refresh identifier.
    ///
    /// Registering overwrites the previous identifier, so signing in again
    /// invalidates the refresh token of the previous sign-in.
    async fn make_tokens(&self, user: &User) -> Result<TokenPair> {
        let refresh_token_id = Uuid::new_v4().to_string();

        let access_token = self.tokens.issue_access(
            &AccessTokenData::from_user(user),
            self.tokens.access_token_ttl(),
        )?;
        let refresh_token = self.tokens.issue_refresh(
            &RefreshTokenData {
                sub: user.id,
                refresh_token_id: refresh_token_id.clone(),
            },
            self.tokens.refresh_token_ttl(),
        )?;

        self.sessions.insert(user.id, &refresh_token_id).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Drop the user's refresh session. Idempotent.
    pub async fn invalidate_session(&self, user_id: Uuid) -> Result<()> {
        self.sessions.invalidate(user_id).await?;
        info!("Invalidated refresh session for user {}", user_id);
        Ok(())
    }

    /// Verify an access token presented with a request
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        self.tokens.verify_access(token)
    }

    /// Create a configured account unless its email is already registered.
    ///
    /// Returns true when the account was created.
    pub async fn seed_user(&self, seed: &SeedUser) -> Result<bool> {
        if self.users.find_by_email(&seed.email).await?.is_some() {
            return Ok(false);
        }
        let user = self
            .users
            .create(&seed.email, &seed.name, &seed.password_hash, seed.role)
            .await?;
        info!("Seeded {} account {}", user.role, user.email);
        Ok(true)
    }
}
