//! Scheduler layer for the monitor
//!
//! This layer owns the per-run polling loop and the reconciliation of
//! status responses into the node store. It manages the lifecycle of a
//! tracked run from the first fetch to the terminal alert.

pub mod poller;
pub mod reconcile;

pub use poller::{RunStatusPoller, RunStatusSource};
pub use reconcile::{CycleOutcome, reconcile};
