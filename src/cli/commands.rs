//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::PasswordHasher;
use crate::cli::{error, info, print_config_summary, success, warn};
use crate::config::{self, loader::CONFIG_FILENAME, Config, HashingConfig};

/// Write a default iam.toml configuration file
pub async fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    if config_path.exists() && !force {
        warn(&format!("{} already exists", config_path.display()));
        return Ok(());
    }

    fs::write(&config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", config_path.display()));
    info("A random signing secret was generated. Set JWT_SECRET to share one across nodes.");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;

    Ok(())
}

/// Load the configuration and report whether it is usable
pub async fn check_config(path: Option<&Path>) -> Result<()> {
    match load_config(path) {
        Ok(config) => {
            print_config_summary(&config);
            println!();
            success("Configuration is valid");
            Ok(())
        }
        Err(e) => {
            error(&format!("Invalid configuration: {}", e));
            Err(e)
        }
    }
}

/// Print a bcrypt hash suitable for a [[seed]] entry
pub async fn hash_password(path: Option<&Path>, password: &str, cost: Option<u32>) -> Result<()> {
    let cost = match (cost, path) {
        (Some(cost), _) => cost,
        (None, Some(_)) => load_config(path)?.hashing.cost,
        (None, None) => match load_config(None) {
            Ok(config) => config.hashing.cost,
            Err(e) => {
                let cost = HashingConfig::default().cost;
                warn(&format!("{}; hashing with the default cost {}", e, cost));
                cost
            }
        },
    };

    let hasher = PasswordHasher::new(cost)?;
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;
    println!("{}", hashed);

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    }
    .map_err(|e| anyhow::anyhow!("{}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_hash_password_rejects_unreadable_config() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(hash_password(Some(&missing), "secret1", None).await.is_err());
    }

    #[tokio::test]
    async fn test_hash_password_explicit_cost() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(hash_password(Some(&missing), "secret1", Some(4)).await.is_ok());
        assert!(hash_password(None, "secret1", Some(2)).await.is_err());
    }
}
