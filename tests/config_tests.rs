//! Configuration loading tests

use std::fs;

use lms_iam::auth::UserRole;
use lms_iam::config::{load_config_from_path, loader, RegistryBackend};
use lms_iam::Error;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("iam.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[server]
host = "127.0.0.1"
port = 8080

[jwt]
secret = "file-secret"
audience = "courses"
issuer = "iam"
access_token_ttl = 900
refresh_token_ttl = 604800

[hashing]
cost = 12

[session]
backend = "redis"
redis_url = "redis://localhost:6379/1"
revoke_on_reuse = true

[[seed]]
email = "admin@example.com"
name = "Admin User"
role = "ADMIN"
password_hash = "$2b$10$fjte5CTKMjM4ar4Ett9/IeFsBZhyXD0KjH8x/5OfbXljqaDG9zZ6G"
"#,
    );

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.jwt.audience, "courses");
    assert_eq!(config.jwt.access_token_ttl, 900);
    assert_eq!(config.hashing.cost, 12);
    assert_eq!(config.session.backend, RegistryBackend::Redis);
    assert!(config.session.revoke_on_reuse);
    assert_eq!(config.seed.len(), 1);
    assert_eq!(config.seed[0].role, UserRole::Admin);
}

#[test]
fn test_defaults_for_optional_sections() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[jwt]
secret = "file-secret"
audience = "courses"
issuer = "iam"
access_token_ttl = 300
refresh_token_ttl = 3600
"#,
    );

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.hashing.cost, 10);
    assert_eq!(config.session.backend, RegistryBackend::Memory);
    assert!(!config.session.revoke_on_reuse);
    assert!(config.seed.is_empty());
}

#[test]
fn test_env_interpolated_secret() {
    std::env::set_var("LMS_IAM_CONFIG_TEST_SECRET", "from-the-environment");
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[jwt]
secret = "${LMS_IAM_CONFIG_TEST_SECRET}"
audience = "courses"
issuer = "iam"
access_token_ttl = 300
refresh_token_ttl = 3600
"#,
    );

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.jwt.secret, "from-the-environment");
    std::env::remove_var("LMS_IAM_CONFIG_TEST_SECRET");
}

#[test]
fn test_unset_secret_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[jwt]
secret = "${LMS_IAM_SURELY_UNSET_SECRET}"
audience = "courses"
issuer = "iam"
access_token_ttl = 300
refresh_token_ttl = 3600
"#,
    );

    assert!(matches!(load_config_from_path(&path), Err(Error::Config(_))));
}

#[test]
fn test_missing_ttl_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[jwt]
secret = "file-secret"
audience = "courses"
issuer = "iam"
access_token_ttl = 300
"#,
    );

    assert!(matches!(load_config_from_path(&path), Err(Error::TomlParse(_))));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_config_from_path(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::ConfigNotFound)));
}

#[test]
fn test_generated_default_config_loads() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &loader::default_config_content());

    let config = load_config_from_path(&path).unwrap();
    assert!(!config.jwt.secret.is_empty());
    assert_eq!(config.session.backend, RegistryBackend::Memory);
}

#[test]
fn test_oversized_ttl_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[jwt]
secret = "file-secret"
audience = "courses"
issuer = "iam"
access_token_ttl = 300
refresh_token_ttl = 10000000000000
"#,
    );

    assert!(matches!(load_config_from_path(&path), Err(Error::Config(_))));
}
