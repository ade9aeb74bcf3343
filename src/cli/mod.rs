//! CLI interface for lms-iam

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lms-iam")]
#[command(version)]
#[command(about = "Authentication and authorization service for the course platform", long_about = None)]
pub struct Cli {
    /// Path to iam.toml (defaults to searching upward from the current directory)
    #[arg(short, long, global = true, env = "LMS_IAM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default iam.toml with a freshly generated signing secret
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load and validate the configuration
    CheckConfig,

    /// Print a bcrypt hash for a seed account
    HashPassword {
        /// Plaintext password to hash
        password: String,

        /// bcrypt cost factor (defaults to hashing.cost, or 10 without a config)
        #[arg(long)]
        cost: Option<u32>,
    },
}
