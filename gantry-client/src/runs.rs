//! Run-related API endpoints

use crate::EngineClient;
use crate::error::Result;
use gantry_core::domain::run::RunSummary;
use gantry_core::dto::run::{RunStatusResponse, StartRunRequest, StartedRun};

impl EngineClient {
    // =============================================================================
    // Run Lifecycle
    // =============================================================================

    /// Start a new run of a workflow
    ///
    /// # Arguments
    /// * `workflow_id` - The workflow to run
    /// * `req` - Input values and execution mode
    ///
    /// # Returns
    /// The engine's acknowledgement, carrying the new run id
    ///
    /// # Example
    /// ```no_run
    /// # use gantry_client::EngineClient;
    /// # use gantry_core::dto::run::{RunMode, StartRunRequest};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = EngineClient::new("http://localhost:8000");
    /// let started = client.start_run("wf-1", StartRunRequest {
    ///     input_values: Default::default(),
    ///     mode: RunMode::Interactive,
    /// }).await?;
    /// println!("Started run {}", started.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start_run(&self, workflow_id: &str, req: StartRunRequest) -> Result<StartedRun> {
        let url = format!("{}/api/workflows/{}/runs", self.base_url, workflow_id);
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Fetch the live status of a run
    ///
    /// # Arguments
    /// * `run_id` - The run identifier
    ///
    /// # Returns
    /// The run's overall status, completion percentage, and task records
    pub async fn run_status(&self, run_id: &str) -> Result<RunStatusResponse> {
        let url = format!("{}/api/runs/{}/status", self.base_url, run_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List the recorded runs of a workflow
    ///
    /// # Arguments
    /// * `workflow_id` - The workflow identifier
    ///
    /// # Returns
    /// Run summaries, newest first as ordered by the engine
    pub async fn list_runs(&self, workflow_id: &str) -> Result<Vec<RunSummary>> {
        let url = format!("{}/api/workflows/{}/runs", self.base_url, workflow_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
