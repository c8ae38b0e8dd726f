//! Node view-model types
//!
//! A node is a vertex of the workflow graph as the client displays it.
//! Run tracking only mutates the per-node `NodeData` bag; node creation,
//! deletion, and graph topology are owned elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::task::TaskStatus;

/// A workflow graph vertex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub node_type: String,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    /// Creates a node with empty display state.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            data: NodeData::default(),
        }
    }

    /// Sets the node's display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.data.title = Some(title.into());
        self
    }
}

/// Mutable per-node display state kept in sync with engine task records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Output mapping from the last observed task for this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<TaskStatus>,
}

/// Per-node configuration kept separately from the rendered node.
///
/// Title aliases live here; task records may reference a node by this
/// title instead of its structural id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
