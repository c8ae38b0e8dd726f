//! Gantry CLI
//!
//! Command-line interface for submitting and tracking workflow runs.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Gantry workflow run tracking CLI", long_about = None)]
struct Cli {
    /// Engine URL
    #[arg(
        long,
        env = "GANTRY_ENGINE_URL",
        default_value = "http://localhost:8000"
    )]
    engine_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        engine_url: cli.engine_url,
    };

    handle_command(cli.command, &config).await
}
