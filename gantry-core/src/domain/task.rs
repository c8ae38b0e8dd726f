//! Task domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Execution status of a single node's task within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Canceled,
}

impl TaskStatus {
    /// A settled task is one the engine will not transition again.
    pub fn is_settled(&self) -> bool {
        !matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }
}

/// Per-node execution record reported by the engine for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Node reference: a structural node id, or the node's display title
    /// when the engine has aliased the node.
    pub node_id: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Child-node outputs keyed by child reference, present when this node
    /// wraps an embedded subworkflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subworkflow_output: Option<HashMap<String, HashMap<String, serde_json::Value>>>,
}
