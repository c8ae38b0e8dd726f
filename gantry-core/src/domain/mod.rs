//! Core domain types
//!
//! This module contains the domain structures shared across the Gantry
//! crates. They model what the engine reports about a run and what the
//! client displays for each node.

pub mod alert;
pub mod node;
pub mod run;
pub mod task;
