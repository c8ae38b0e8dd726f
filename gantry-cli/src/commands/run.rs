//! Run command handlers
//!
//! Submits workflow runs, watches them to completion, and checks the
//! status of individual runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use serde_json::Value as JsonValue;

use gantry_client::EngineClient;
use gantry_core::domain::alert::AlertSeverity;
use gantry_core::domain::node::Node;
use gantry_core::domain::task::TaskStatus;
use gantry_core::dto::run::RunMode;
use gantry_monitor::scheduler::RunStatusPoller;
use gantry_monitor::service::{
    AlertSink, InMemoryNodeStore, LaunchOutcome, NodeStore, WorkflowLauncher,
};

use crate::config::Config;

/// Run subcommands
#[derive(Subcommand)]
pub enum RunCommands {
    /// Submit a new run
    Start {
        /// Workflow ID
        workflow_id: String,

        /// Input values as a JSON object
        #[arg(long, default_value = "{}")]
        inputs: String,

        /// Poll the run to completion after submitting
        #[arg(short, long)]
        watch: bool,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// Watch an existing run until it settles
    Watch {
        /// Workflow ID
        workflow_id: String,

        /// Run ID
        run_id: String,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// Show the current status of a run
    Status {
        /// Run ID
        run_id: String,
    },
}

/// Handle run commands
///
/// Routes run subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The run command to execute
/// * `config` - The CLI configuration
pub async fn handle_run_command(command: RunCommands, config: &Config) -> Result<()> {
    let client = Arc::new(EngineClient::new(&config.engine_url));

    match command {
        RunCommands::Start {
            workflow_id,
            inputs,
            watch,
            interval_ms,
        } => start_run(client, &workflow_id, &inputs, watch, interval_ms).await,
        RunCommands::Watch {
            workflow_id,
            run_id,
            interval_ms,
        } => watch_run(client, &workflow_id, &run_id, interval_ms).await,
        RunCommands::Status { run_id } => show_status(client, &run_id).await,
    }
}

/// Alert sink that prints colored alerts to the terminal
struct ConsoleAlertSink;

impl AlertSink for ConsoleAlertSink {
    fn alert(&self, message: &str, severity: AlertSeverity) {
        let line = match severity {
            AlertSeverity::Success => message.green(),
            AlertSeverity::Warning => message.yellow(),
            AlertSeverity::Danger => message.red(),
            AlertSeverity::Default => message.normal(),
        };
        println!("{}", line);
    }
}

/// Fetch a workflow definition and seed a node store from it
async fn load_store(
    client: &Arc<EngineClient>,
    workflow_id: &str,
) -> Result<Arc<InMemoryNodeStore>> {
    let workflow = client
        .get_workflow(workflow_id)
        .await
        .context("Failed to fetch workflow definition")?;
    Ok(Arc::new(InMemoryNodeStore::with_nodes(
        workflow.nodes,
        workflow.node_configs,
    )))
}

/// Submit a run, optionally polling it to completion
async fn start_run(
    client: Arc<EngineClient>,
    workflow_id: &str,
    inputs: &str,
    watch: bool,
    interval_ms: u64,
) -> Result<()> {
    let input_values: HashMap<String, JsonValue> =
        serde_json::from_str(inputs).context("Inputs must be a JSON object")?;

    let store = load_store(&client, workflow_id).await?;
    let alerts: Arc<dyn AlertSink> = Arc::new(ConsoleAlertSink);
    let launcher = WorkflowLauncher::new(Arc::clone(&client), store.clone(), alerts.clone());

    match launcher
        .launch(workflow_id, input_values, RunMode::Interactive)
        .await?
    {
        LaunchOutcome::Started { run_id } => {
            println!("{}", format!("Run {} started.", run_id).bold());
            if watch {
                watch_with_store(client, store, alerts, &run_id, interval_ms).await?;
            }
            Ok(())
        }
        LaunchOutcome::CredentialRequired { provider, auth_url } => {
            println!(
                "{}",
                format!("⚠ The {} credential is invalid or expired", provider).yellow()
            );
            println!("  Authorize at: {}", auth_url);
            Ok(())
        }
        LaunchOutcome::Rejected => bail!("Run submission rejected"),
    }
}

/// Watch an existing run until it settles
async fn watch_run(
    client: Arc<EngineClient>,
    workflow_id: &str,
    run_id: &str,
    interval_ms: u64,
) -> Result<()> {
    let store = load_store(&client, workflow_id).await?;
    let alerts: Arc<dyn AlertSink> = Arc::new(ConsoleAlertSink);
    watch_with_store(client, store, alerts, run_id, interval_ms).await
}

/// Poll a run to completion and print per-node results
async fn watch_with_store(
    client: Arc<EngineClient>,
    store: Arc<InMemoryNodeStore>,
    alerts: Arc<dyn AlertSink>,
    run_id: &str,
    interval_ms: u64,
) -> Result<()> {
    let poller = RunStatusPoller::new(
        client,
        store.clone(),
        alerts,
        Duration::from_millis(interval_ms),
    );

    poller.start(run_id);
    poller.join().await;

    println!();
    println!("{}", "Node results:".bold());
    for node in store.nodes() {
        print_node_result(&node);
    }

    Ok(())
}

/// Show the current status of a run without polling
async fn show_status(client: Arc<EngineClient>, run_id: &str) -> Result<()> {
    let status = client.run_status(run_id).await?;

    println!("{}", format!("Run {}:", run_id).bold());
    println!("  Status:   {:?}", status.status);
    if let Some(percent) = status.percentage_complete {
        println!("  Progress: {:.0}%", percent);
    }

    if status.tasks.is_empty() {
        println!("{}", "  No tasks reported yet.".dimmed());
    } else {
        println!("  Tasks:");
        for task in &status.tasks {
            println!("    {} {}", task_status_label(Some(task.status)), task.node_id);
            if let Some(error) = &task.error {
                println!("      {}", error.red());
            }
        }
    }

    Ok(())
}

/// Print one node's reconciled result
fn print_node_result(node: &Node) {
    let name = node.data.title.as_deref().unwrap_or(&node.id);
    println!(
        "  {} {} {}",
        task_status_label(node.data.task_status),
        name,
        format!("({})", node.node_type).dimmed()
    );
    if let Some(error) = &node.data.error {
        println!("      {}", error.red());
    }
}

/// Colored label for a task status
fn task_status_label(status: Option<TaskStatus>) -> ColoredString {
    match status {
        Some(TaskStatus::Completed) => "✓".green(),
        Some(TaskStatus::Failed) => "✗".red(),
        Some(TaskStatus::Running) => "●".yellow(),
        Some(TaskStatus::Pending) => "○".normal(),
        Some(TaskStatus::Canceled) => "–".dimmed(),
        None => "·".dimmed(),
    }
}
