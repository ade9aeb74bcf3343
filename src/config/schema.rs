//! Configuration schema definitions

use serde::{Deserialize, Serialize};

use crate::auth::models::UserRole;
use crate::auth::password::PasswordHasher;
use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Token signing settings. Required: there are no safe defaults.
    pub jwt: JwtConfig,

    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub session: SessionConfig,

    /// Accounts created at startup when absent
    #[serde(default)]
    pub seed: Vec<SeedUser>,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HS256 signing secret
    pub secret: String,

    pub audience: String,

    pub issuer: String,

    /// Access token lifetime in seconds
    pub access_token_ttl: u64,

    /// Refresh token lifetime in seconds
    pub refresh_token_ttl: u64,
}

/// Password hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// bcrypt cost factor
    #[serde(default = "default_cost")]
    pub cost: u32,
}

/// Longest accepted token lifetime: ten years in seconds
pub const MAX_TOKEN_TTL: u64 = 10 * 365 * 24 * 60 * 60;

fn default_cost() -> u32 {
    10
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            cost: default_cost(),
        }
    }
}

/// Refresh session registry configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: RegistryBackend,

    /// Required when `backend = "redis"`
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Revoke the live session when a stale refresh token is presented
    #[serde(default)]
    pub revoke_on_reuse: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistryBackend {
    #[default]
    Memory,
    Redis,
}

/// An account created at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// bcrypt hash, see `lms-iam hash-password`
    pub password_hash: String,
}

impl Config {
    /// Reject configurations the service cannot safely start with
    pub fn validate(&self) -> Result<()> {
        let jwt = &self.jwt;
        if jwt.secret.trim().is_empty() {
            return Err(Error::Config("jwt.secret must be set".to_string()));
        }
        if jwt.audience.trim().is_empty() {
            return Err(Error::Config("jwt.audience must be set".to_string()));
        }
        if jwt.issuer.trim().is_empty() {
            return Err(Error::Config("jwt.issuer must be set".to_string()));
        }
        if jwt.access_token_ttl == 0 || jwt.refresh_token_ttl == 0 {
            return Err(Error::Config("token TTLs must be greater than zero".to_string()));
        }
        if jwt.access_token_ttl > MAX_TOKEN_TTL || jwt.refresh_token_ttl > MAX_TOKEN_TTL {
            return Err(Error::Config(format!(
                "token TTLs must not exceed {} seconds",
                MAX_TOKEN_TTL
            )));
        }
        if jwt.access_token_ttl >= jwt.refresh_token_ttl {
            return Err(Error::Config(
                "jwt.access_token_ttl must be shorter than jwt.refresh_token_ttl".to_string(),
            ));
        }

        PasswordHasher::new(self.hashing.cost)?;

        if self.session.backend == RegistryBackend::Redis
            && self
                .session
                .redis_url
                .as_deref()
                .map_or(true, |url| url.trim().is_empty())
        {
            return Err(Error::Config(
                "session.redis_url is required for the redis backend".to_string(),
            ));
        }

        for seed in &self.seed {
            if seed.email.trim().is_empty() || seed.password_hash.trim().is_empty() {
                return Err(Error::Config(
                    "seed entries need an email and a password_hash".to_string(),
                ));
            }
        }

        Ok(())
    }
}
