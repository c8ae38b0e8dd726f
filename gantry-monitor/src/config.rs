//! Monitor configuration
//!
//! Defines the configurable parameters for run tracking: engine connection
//! settings, the status poll interval, and per-request timeouts.

use std::time::Duration;

/// Monitor configuration
///
/// Intervals and timeouts are configurable to allow tuning for different
/// deployments (local engine vs remote, fast vs slow networks).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Engine base URL (e.g., "http://localhost:8000")
    pub engine_url: String,

    /// How often to poll the engine for run status
    pub poll_interval: Duration,

    /// Timeout applied to individual status requests
    pub request_timeout: Duration,
}

impl MonitorConfig {
    /// Creates a new configuration with defaults
    pub fn new(engine_url: String) -> Self {
        Self {
            engine_url,
            poll_interval: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - ENGINE_URL (required)
    /// - POLL_INTERVAL_MS (optional, milliseconds, default: 1000)
    /// - REQUEST_TIMEOUT_SECS (optional, seconds, default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        let engine_url = std::env::var("ENGINE_URL")
            .map_err(|_| anyhow::anyhow!("ENGINE_URL environment variable not set"))?;

        let poll_interval = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(1000));

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        Ok(Self {
            engine_url,
            poll_interval,
            request_timeout,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.engine_url.is_empty() {
            anyhow::bail!("engine_url cannot be empty");
        }

        if !self.engine_url.starts_with("http://") && !self.engine_url.starts_with("https://") {
            anyhow::bail!("engine_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000".to_string())
    }
}
