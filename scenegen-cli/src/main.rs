//! Scenegen CLI
//!
//! Command-line interface for submitting generation jobs to a scenegen
//! backend and following their progress until completion.

mod commands;
mod config;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "scenegen")]
#[command(about = "Client for a remote 3D object and HDRI generation backend", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(
        long,
        env = "SCENEGEN_BASE_URL",
        default_value = "http://localhost:3000"
    )]
    base_url: String,

    /// Client identifier reported to the backend (random if omitted)
    #[arg(long, env = "SCENEGEN_CLIENT_ID")]
    client_id: Option<String>,

    /// Poll interval in seconds
    #[arg(long, env = "SCENEGEN_POLL_INTERVAL", default_value_t = 1)]
    poll_interval: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenegen_client=info,scenegen_task=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        client_id: cli
            .client_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        default_poll_interval: Duration::from_secs(cli.poll_interval),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
