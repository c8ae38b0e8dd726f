//! Node-state store
//!
//! Owns the node view-models mutated from polling callbacks. The poller
//! holds no node state of its own; every update goes through this trait,
//! which keeps reconciliation testable against an isolated store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use gantry_core::domain::node::{Node, NodeConfig};
use gantry_core::domain::run::RunOutcome;
use gantry_core::domain::task::TaskStatus;
use serde_json::Value as JsonValue;

/// State owner for run-scoped node data
///
/// One store tracks one workflow's nodes and the progress of the run
/// currently being polled.
pub trait NodeStore: Send + Sync {
    /// Snapshot of the current nodes
    fn nodes(&self) -> Vec<Node>;

    /// Resolve a task's node reference to a node
    ///
    /// Matches the node id first, then the node's display title, then the
    /// title stored in node configuration. Engine task records may carry
    /// either form (see [`gantry_core::domain::task::TaskRecord`]).
    fn find_node(&self, node_ref: &str) -> Option<Node>;

    /// Overwrite a node's outputs, error, and task status from a task record
    fn apply_task_update(
        &self,
        node_id: &str,
        outputs: HashMap<String, JsonValue>,
        error: Option<String>,
        status: TaskStatus,
    );

    /// Overwrite a node's outputs from a parent task's subworkflow output
    ///
    /// Child tasks behind a subworkflow report no status of their own; the
    /// node is marked `COMPLETED` and its stored error is left untouched.
    fn apply_subworkflow_output(&self, node_id: &str, outputs: HashMap<String, JsonValue>);

    /// Overwrite the displayed completion percentage
    fn set_run_progress(&self, percent: f32);

    /// Current completion percentage
    fn run_progress(&self) -> f32;

    /// Record how the tracked run ended
    fn set_run_outcome(&self, outcome: RunOutcome);

    /// Outcome recorded for the tracked run, if it has ended
    fn run_outcome(&self) -> Option<RunOutcome>;

    /// Clear per-node run data, progress, and outcome before a new run
    fn reset_run(&self);
}

/// In-memory implementation of NodeStore
///
/// Uses Arc<Mutex<_>> for thread-safe access from the polling task and the
/// caller's context.
#[derive(Clone, Default)]
pub struct InMemoryNodeStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    nodes: Vec<Node>,
    node_configs: HashMap<String, NodeConfig>,
    progress: f32,
    outcome: Option<RunOutcome>,
}

impl InMemoryNodeStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with nodes and their configs
    pub fn with_nodes(nodes: Vec<Node>, node_configs: HashMap<String, NodeConfig>) -> Self {
        let store = Self::new();
        store.load(nodes, node_configs);
        store
    }

    /// Replaces the stored nodes and configs (e.g. after loading a workflow)
    pub fn load(&self, nodes: Vec<Node>, node_configs: HashMap<String, NodeConfig>) {
        let mut inner = self.inner.lock().unwrap();
        inner.nodes = nodes;
        inner.node_configs = node_configs;
        inner.progress = 0.0;
        inner.outcome = None;
    }
}

impl NodeStore for InMemoryNodeStore {
    fn nodes(&self) -> Vec<Node> {
        self.inner.lock().unwrap().nodes.clone()
    }

    fn find_node(&self, node_ref: &str) -> Option<Node> {
        let inner = self.inner.lock().unwrap();

        if let Some(node) = inner
            .nodes
            .iter()
            .find(|n| n.id == node_ref || n.data.title.as_deref() == Some(node_ref))
        {
            return Some(node.clone());
        }

        // Title lookups can collide when two nodes share a title; the first
        // match wins and aliases the later node.
        let aliased = inner
            .node_configs
            .iter()
            .find(|(_, config)| config.title.as_deref() == Some(node_ref))
            .map(|(id, _)| id.clone())?;
        inner.nodes.iter().find(|n| n.id == aliased).cloned()
    }

    fn apply_task_update(
        &self,
        node_id: &str,
        outputs: HashMap<String, JsonValue>,
        error: Option<String>,
        status: TaskStatus,
    ) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(node) = inner.nodes.iter_mut().find(|n| n.id == node_id) {
            node.data.run = Some(outputs);
            node.data.error = error;
            node.data.task_status = Some(status);
        }
    }

    fn apply_subworkflow_output(&self, node_id: &str, outputs: HashMap<String, JsonValue>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(node) = inner.nodes.iter_mut().find(|n| n.id == node_id) {
            node.data.run = Some(outputs);
            node.data.task_status = Some(TaskStatus::Completed);
        }
    }

    fn set_run_progress(&self, percent: f32) {
        self.inner.lock().unwrap().progress = percent;
    }

    fn run_progress(&self) -> f32 {
        self.inner.lock().unwrap().progress
    }

    fn set_run_outcome(&self, outcome: RunOutcome) {
        self.inner.lock().unwrap().outcome = Some(outcome);
    }

    fn run_outcome(&self) -> Option<RunOutcome> {
        self.inner.lock().unwrap().outcome
    }

    fn reset_run(&self) {
        let mut inner = self.inner.lock().unwrap();
        for node in inner.nodes.iter_mut() {
            node.data.run = None;
            node.data.error = None;
            node.data.task_status = None;
        }
        inner.progress = 0.0;
        inner.outcome = None;
    }
}
