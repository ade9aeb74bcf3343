//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "iam.toml";

/// Load and validate configuration from iam.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load and validate configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    parse_config(&content)
}

/// Parse configuration text, interpolating environment variables first
pub fn parse_config(content: &str) -> Result<Config> {
    let content = interpolate_env_vars(content);
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a random signing secret
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Generate a default configuration file with a fresh signing secret
pub fn default_config_content() -> String {
    DEFAULT_CONFIG.replace("{{secret}}", &generate_secret())
}

const DEFAULT_CONFIG: &str = r#"# lms-iam configuration
# Values of the form ${VAR:-default} are read from the environment.

[server]
host = "0.0.0.0"
port = 3000

[jwt]
secret = "${JWT_SECRET:-{{secret}}}"
audience = "${JWT_TOKEN_AUDIENCE:-localhost:3000}"
issuer = "${JWT_TOKEN_ISSUER:-localhost:3000}"
access_token_ttl = ${JWT_ACCESS_TOKEN_TTL:-3600}
refresh_token_ttl = ${JWT_REFRESH_TOKEN_TTL:-86400}

[hashing]
cost = ${BCRYPT_SALT:-10}

[session]
backend = "memory"  # or "redis"
# redis_url = "redis://:${REDIS_PASSWORD}@${REDIS_HOST:-localhost}:${REDIS_PORT:-6379}/0"
revoke_on_reuse = false

# Accounts created at startup. Generate hashes with `lms-iam hash-password`.
# [[seed]]
# email = "admin@example.com"
# name = "Admin User"
# role = "ADMIN"
# password_hash = "$2b$10$..."
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("LMS_IAM_TEST_VAR", "hello");
        let content = "value = \"${LMS_IAM_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("LMS_IAM_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_config_parses() {
        let config = parse_config(&default_config_content()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.jwt.secret.len(), 64);
        assert!(config.jwt.access_token_ttl < config.jwt.refresh_token_ttl);
    }

    #[test]
    fn test_generated_secrets_differ() {
        assert_ne!(generate_secret(), generate_secret());
    }

    #[test]
    fn test_missing_jwt_section_is_an_error() {
        assert!(parse_config("[server]\nport = 3000\n").is_err());
    }
}
