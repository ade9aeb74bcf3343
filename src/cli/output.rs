//! CLI output formatting utilities

use colored::Colorize;

use crate::config::{Config, RegistryBackend};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print a configuration summary. The signing secret is never shown.
pub fn print_config_summary(config: &Config) {
    println!("{}", "Configuration".bold().underline());
    println!();
    println!(
        "  {} {}:{}",
        "Listen:".bold(),
        config.server.host,
        config.server.port
    );
    println!("  {} {}", "Audience:".bold(), config.jwt.audience);
    println!("  {} {}", "Issuer:".bold(), config.jwt.issuer);
    println!(
        "  {} {}s / {}s",
        "Access/refresh TTL:".bold(),
        config.jwt.access_token_ttl,
        config.jwt.refresh_token_ttl
    );
    println!("  {} {}", "bcrypt cost:".bold(), config.hashing.cost);

    let backend = match config.session.backend {
        RegistryBackend::Memory => "memory".yellow(),
        RegistryBackend::Redis => "redis".green(),
    };
    println!("  {} {}", "Session registry:".bold(), backend);
    println!(
        "  {} {}",
        "Revoke on reuse:".bold(),
        config.session.revoke_on_reuse
    );

    if !config.seed.is_empty() {
        println!();
        println!("  {}", "Seed accounts:".bold());
        for seed in &config.seed {
            println!("    - {} ({})", seed.email, seed.role);
        }
    }
}
