use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lms_iam::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lms_iam=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => cli::commands::init(cli.config.clone(), force).await,
        Commands::Serve { host, port } => cli::commands::serve(config, host, port).await,
        Commands::CheckConfig => cli::commands::check_config(config).await,
        Commands::HashPassword { password, cost } => {
            cli::commands::hash_password(config, &password, cost).await
        }
    }
}
