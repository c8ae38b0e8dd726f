//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod history;
mod run;

pub use history::HistoryCommands;
pub use run::RunCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run submission and tracking
    Run {
        #[command(subcommand)]
        command: RunCommands,
    },
    /// Run history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run { command } => run::handle_run_command(command, config).await,
        Commands::History { command } => history::handle_history_command(command, config).await,
    }
}
