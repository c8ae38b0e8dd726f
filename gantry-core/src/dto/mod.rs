//! Data transfer objects
//!
//! Payloads exchanged with the workflow engine's HTTP API. Kept separate
//! from the domain types so wire-shape changes stay at this boundary.

pub mod credential;
pub mod run;
pub mod workflow;
