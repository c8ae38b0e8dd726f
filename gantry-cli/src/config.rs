//! Configuration module
//!
//! Handles CLI configuration including the engine URL.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the workflow engine
    pub engine_url: String,
}
