//! Gantry Monitor
//!
//! Client-side run tracking engine for Gantry workflows.
//!
//! Architecture:
//! - Configuration: engine connection settings and poll interval
//! - Services: node-state store, alert boundary, run submission, run history
//! - Scheduler: per-run status polling and reconciliation
//!
//! The monitor submits workflow runs to the engine, polls their status at
//! a fixed interval, and reconciles per-node task results into a local
//! node store until each run reaches a terminal state.

pub mod config;
pub mod scheduler;
pub mod service;

pub use config::MonitorConfig;
pub use scheduler::{CycleOutcome, RunStatusPoller, RunStatusSource};
pub use service::{
    AlertSink, InMemoryNodeStore, LaunchOutcome, NodeStore, RunHistory, TracingAlertSink,
    WorkflowLauncher,
};
