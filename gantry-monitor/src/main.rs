//! Gantry Monitor
//!
//! A headless watcher that tracks one workflow run to completion.
//!
//! Architecture:
//! - Configuration: load engine settings from environment or defaults
//! - Client: HTTP communication with the workflow engine
//! - Store: local node-state mirror seeded from the workflow definition
//! - Scheduler: status polling and reconciliation
//!
//! The watcher loads the workflow's nodes, polls the run's status at a
//! fixed interval, and logs reconciled node results and the final outcome.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gantry_client::EngineClient;
use gantry_monitor::config::MonitorConfig;
use gantry_monitor::scheduler::RunStatusPoller;
use gantry_monitor::service::{InMemoryNodeStore, NodeStore, TracingAlertSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gantry monitor");

    // Load configuration
    let config = load_config()?;
    info!("Loaded configuration: engine_url={}", config.engine_url);

    let workflow_id =
        std::env::var("WORKFLOW_ID").context("WORKFLOW_ID environment variable not set")?;
    let run_id = std::env::var("RUN_ID").context("RUN_ID environment variable not set")?;

    // Initialize engine client with a bounded per-request timeout
    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let client = Arc::new(EngineClient::with_client(
        config.engine_url.clone(),
        http_client,
    ));

    info!("Engine client initialized");

    // Seed the node store from the workflow definition
    let workflow = client
        .get_workflow(&workflow_id)
        .await
        .context("Failed to fetch workflow definition")?;
    info!(
        "Loaded workflow '{}' with {} node(s)",
        workflow.name,
        workflow.nodes.len()
    );

    let store = Arc::new(InMemoryNodeStore::with_nodes(
        workflow.nodes,
        workflow.node_configs,
    ));

    // Poll the run to completion
    let poller = RunStatusPoller::new(
        client,
        store.clone(),
        Arc::new(TracingAlertSink),
        config.poll_interval,
    );

    info!(
        "Polling run {} every {:?}",
        run_id, config.poll_interval
    );
    poller.start(&run_id);
    poller.join().await;

    for node in store.nodes() {
        match node.data.task_status {
            Some(status) => info!("Node {}: {:?}", node.id, status),
            None => info!("Node {}: no task observed", node.id),
        }
    }

    match store.run_outcome() {
        Some(outcome) => info!("Run {} finished: {:?}", run_id, outcome),
        None => warn!("Polling for run {} ended without a recorded outcome", run_id),
    }

    Ok(())
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<MonitorConfig> {
    match MonitorConfig::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(_) => {
            info!("Failed to load config from environment, using defaults");
            let config = MonitorConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
