//! Workflow DTOs for the engine API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::node::{Node, NodeConfig};

/// Workflow definition as served by the engine.
///
/// Carries enough of the graph to seed a node store for run tracking:
/// the nodes and the per-node config map backing title aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Per-node configuration keyed by node id.
    #[serde(default)]
    pub node_configs: HashMap<String, NodeConfig>,
}
