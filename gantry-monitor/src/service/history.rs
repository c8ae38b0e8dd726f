//! Run history
//!
//! On-demand run-list fetch, with a refresh variant that re-queries the
//! live status of runs still in flight. Covers runs left running across a
//! client restart, where no poller was active to observe them settle.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use gantry_client::EngineClient;
use gantry_core::domain::run::RunSummary;

/// Fetches and refreshes the run history of a workflow
pub struct RunHistory {
    client: Arc<EngineClient>,
}

impl RunHistory {
    /// Creates a new run history service
    pub fn new(client: Arc<EngineClient>) -> Self {
        Self { client }
    }

    /// Lists the engine's recorded runs for a workflow
    pub async fn fetch(&self, workflow_id: &str) -> Result<Vec<RunSummary>> {
        self.client
            .list_runs(workflow_id)
            .await
            .context("Failed to fetch workflow runs")
    }

    /// Lists runs, re-querying the live status of any still active
    ///
    /// Terminal runs are returned as listed; runs the list reports as
    /// still pending or running get their status replaced with a fresh
    /// status query before the list is returned.
    pub async fn refresh(&self, workflow_id: &str) -> Result<Vec<RunSummary>> {
        let mut runs = self.fetch(workflow_id).await?;

        for run in runs.iter_mut() {
            if !run.status.is_active() {
                continue;
            }

            debug!("Refreshing status of active run {}", run.id);
            let status = self
                .client
                .run_status(&run.id)
                .await
                .with_context(|| format!("Failed to refresh status of run {}", run.id))?;
            run.status = status.status;
        }

        Ok(runs)
    }
}
