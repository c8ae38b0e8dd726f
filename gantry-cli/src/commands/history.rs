//! Run history command handlers
//!
//! Lists a workflow's recorded runs, with an option to re-query the live
//! status of runs the list still reports as in flight.

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use gantry_client::EngineClient;
use gantry_core::domain::run::{RunStatus, RunSummary};
use gantry_monitor::service::RunHistory;

use crate::config::Config;

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List recorded runs for a workflow
    List {
        /// Workflow ID
        workflow_id: String,
    },
    /// List runs, refreshing the status of any still in flight
    Refresh {
        /// Workflow ID
        workflow_id: String,
    },
}

/// Handle history commands
///
/// Routes history subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The history command to execute
/// * `config` - The CLI configuration
pub async fn handle_history_command(command: HistoryCommands, config: &Config) -> Result<()> {
    let history = RunHistory::new(Arc::new(EngineClient::new(&config.engine_url)));

    match command {
        HistoryCommands::List { workflow_id } => {
            let runs = history.fetch(&workflow_id).await?;
            print_runs(&runs);
            Ok(())
        }
        HistoryCommands::Refresh { workflow_id } => {
            let runs = history.refresh(&workflow_id).await?;
            print_runs(&runs);
            Ok(())
        }
    }
}

/// Print a list of run summaries
fn print_runs(runs: &[RunSummary]) {
    if runs.is_empty() {
        println!("{}", "No runs found.".yellow());
        return;
    }

    println!("{}", format!("Found {} run(s):", runs.len()).bold());
    println!();
    for run in runs {
        print_run_summary(run);
    }
}

/// Print one run summary line
fn print_run_summary(run: &RunSummary) {
    let status = match run.status {
        RunStatus::Completed => "COMPLETED".green(),
        RunStatus::Failed => "FAILED".red(),
        RunStatus::Canceled => "CANCELED".dimmed(),
        RunStatus::Running => "RUNNING".yellow(),
        RunStatus::Pending => "PENDING".normal(),
        RunStatus::Paused => "PAUSED".yellow(),
    };

    let started = run
        .start_time
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    println!("  {}  {:<10}  started {}", run.id.bold(), status, started);
}
