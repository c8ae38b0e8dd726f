//! Run DTOs for the engine API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::run::RunStatus;
use crate::domain::task::TaskRecord;

/// Response from the run-status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatusResponse {
    pub status: RunStatus,
    /// Overall completion in [0, 100]. Overwrite semantics on the client;
    /// non-monotonic values are displayed as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_complete: Option<f32>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

/// Execution mode requested at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Interactive,
    Batch,
}

/// Request to start a new run of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRunRequest {
    pub input_values: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub mode: RunMode,
}

/// Engine acknowledgement of a started run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartedRun {
    pub id: String,
    pub status: RunStatus,
}
