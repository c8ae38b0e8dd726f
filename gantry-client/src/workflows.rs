//! Workflow-related API endpoints

use crate::EngineClient;
use crate::error::Result;
use gantry_core::dto::workflow::WorkflowDefinition;

impl EngineClient {
    // =============================================================================
    // Workflow Definitions
    // =============================================================================

    /// Get a workflow definition by ID
    ///
    /// The definition carries the workflow's nodes and per-node config,
    /// which seed a node store before tracking one of its runs.
    ///
    /// # Arguments
    /// * `workflow_id` - The workflow identifier
    ///
    /// # Returns
    /// The workflow definition
    pub async fn get_workflow(&self, workflow_id: &str) -> Result<WorkflowDefinition> {
        let url = format!("{}/api/workflows/{}", self.base_url, workflow_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
