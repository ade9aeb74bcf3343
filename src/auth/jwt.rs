//! JWT token handling

use crate::auth::models::{User, UserRole};
use crate::config::JwtConfig;
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// Payload of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenData {
    /// Subject (user ID)
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AccessTokenData {
    pub fn from_user(user: &User) -> Self {
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Payload of a refresh token. Carries no role, so it never passes as an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenData {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Identifier mirrored in the session registry
    pub refresh_token_id: String,
}

/// JWT claims: a token payload plus the registered claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims<T> {
    #[serde(flatten)]
    pub data: T,
    /// Audience
    pub aud: String,
    /// Issuer
    pub iss: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

pub type AccessClaims = Claims<AccessTokenData>;
pub type RefreshClaims = Claims<RefreshTokenData>;

impl<T> Claims<T> {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() > self.exp
    }
}

/// Signs and verifies tokens with a shared HS256 secret.
///
/// Stateless: revocation of refresh tokens is the session registry's job.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    audience: String,
    issuer: String,
    access_token_ttl: u64,
    refresh_token_ttl: u64,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            audience: config.audience.clone(),
            issuer: config.issuer.clone(),
            access_token_ttl: config.access_token_ttl,
            refresh_token_ttl: config.refresh_token_ttl,
        }
    }

    pub fn access_token_ttl(&self) -> u64 {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> u64 {
        self.refresh_token_ttl
    }

    /// Sign an access token valid for `ttl` seconds
    pub fn issue_access(&self, data: &AccessTokenData, ttl: u64) -> Result<String> {
        self.issue(data, ttl)
    }

    /// Sign a refresh token valid for `ttl` seconds
    pub fn issue_refresh(&self, data: &RefreshTokenData, ttl: u64) -> Result<String> {
        self.issue(data, ttl)
    }

    fn issue<T: Serialize + Clone>(&self, data: &T, ttl: u64) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let exp = i64::try_from(ttl)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| Error::Config(format!("token TTL of {} seconds is out of range", ttl)))?;
        let claims = Claims {
            data: data.clone(),
            aud: self.audience.clone(),
            iss: self.issuer.clone(),
            iat: now,
            exp,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify a token against the configured audience and issuer
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>> {
        self.verify_with(token, &self.audience, &self.issuer)
    }

    /// Verify signature, expiry, audience and issuer, then decode the payload
    pub fn verify_with<T: DeserializeOwned>(
        &self,
        token: &str,
        audience: &str,
        issuer: &str,
    ) -> Result<Claims<T>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let data = decode::<Claims<T>>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims> {
        self.verify(token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims> {
        self.verify(token)
    }
}
