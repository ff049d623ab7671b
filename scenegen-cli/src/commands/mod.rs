//! CLI command handlers

mod generate;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a 3D object from a prompt and a reference sketch
    Object {
        /// Text description of the object
        #[arg(long)]
        prompt: String,

        /// Path to the reference sketch image
        #[arg(long)]
        image: PathBuf,
    },
    /// Generate an HDRI environment from a prompt
    Hdri {
        /// Text description of the environment
        #[arg(long)]
        prompt: String,
    },
}

/// Routes commands to their handlers
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Object { prompt, image } => generate::run_object(config, prompt, image).await,
        Commands::Hdri { prompt } => generate::run_hdri(config, prompt).await,
    }
}
