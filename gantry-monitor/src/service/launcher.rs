//! Run submission
//!
//! Handles workflow run submission including:
//! - Pre-flight credential gating for provider-backed nodes
//! - Resetting run state in the store before a new run
//! - Mapping structured provider errors to caller-facing alerts

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use tracing::{error, info};

use gantry_client::{ClientError, EngineClient};
use gantry_core::domain::alert::AlertSeverity;
use gantry_core::dto::run::{RunMode, StartRunRequest};

use crate::service::{AlertSink, NodeStore};

/// Result of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The engine accepted the run
    Started { run_id: String },
    /// A required provider credential is missing or expired; the caller
    /// should send the user to `auth_url` instead of running
    CredentialRequired { provider: String, auth_url: String },
    /// The engine rejected the submission; an alert has been raised
    Rejected,
}

/// Submits workflow runs once the provider credential gate passes
pub struct WorkflowLauncher {
    client: Arc<EngineClient>,
    store: Arc<dyn NodeStore>,
    alerts: Arc<dyn AlertSink>,
}

impl WorkflowLauncher {
    /// Creates a new launcher
    pub fn new(
        client: Arc<EngineClient>,
        store: Arc<dyn NodeStore>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            client,
            store,
            alerts,
        }
    }

    /// Starts a run of `workflow_id` with the given input values
    ///
    /// Submission is blocked until the credential gate passes: when any
    /// node depends on an external provider credential, the engine must
    /// report that credential valid first.
    ///
    /// # Arguments
    /// * `workflow_id` - The workflow to run
    /// * `input_values` - Values for the workflow's input nodes
    /// * `mode` - Execution mode requested from the engine
    pub async fn launch(
        &self,
        workflow_id: &str,
        input_values: HashMap<String, JsonValue>,
        mode: RunMode,
    ) -> Result<LaunchOutcome> {
        if let Some(provider) = self.required_credential_provider() {
            let check = self
                .client
                .validate_credential(provider)
                .await
                .context("Failed to validate provider credential")?;

            if !check.is_valid {
                info!(
                    "Credential for provider {} is invalid, deferring to authorization",
                    provider
                );
                return Ok(LaunchOutcome::CredentialRequired {
                    provider: provider.to_string(),
                    auth_url: format!("{}/auth/{}", self.client.base_url(), provider),
                });
            }
        }

        self.store.reset_run();
        self.alerts
            .alert("Starting workflow run...", AlertSeverity::Default);

        match self
            .client
            .start_run(
                workflow_id,
                StartRunRequest { input_values, mode },
            )
            .await
        {
            Ok(started) => {
                info!("Run {} started for workflow {}", started.id, workflow_id);
                Ok(LaunchOutcome::Started { run_id: started.id })
            }
            Err(e) => {
                error!("Error starting run for workflow {}: {:#}", workflow_id, e);
                self.alert_submission_failure(&e);
                Ok(LaunchOutcome::Rejected)
            }
        }
    }

    /// First provider credential the current nodes depend on, if any
    fn required_credential_provider(&self) -> Option<&'static str> {
        self.store
            .nodes()
            .iter()
            .find_map(|node| credential_provider(&node.node_type))
    }

    fn alert_submission_failure(&self, error: &ClientError) {
        match error.provider_error() {
            Some(provider_error) => {
                let message = format!(
                    "{} Model Error: {}",
                    provider_error.provider.to_uppercase(),
                    provider_error.message
                );
                self.alerts.alert(&message, provider_error.severity());
            }
            None => self
                .alerts
                .alert("Error starting workflow run.", AlertSeverity::Danger),
        }
    }
}

/// Provider credential required by a node type, if any
pub fn credential_provider(node_type: &str) -> Option<&'static str> {
    match node_type {
        "GoogleSheetsReadNode" | "GoogleSheetsWriteNode" => Some("google"),
        _ => None,
    }
}
