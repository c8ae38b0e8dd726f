//! Alert sinks
//!
//! Caller-facing notification boundary. The poller and launcher report
//! run lifecycle events here instead of owning any presentation.

use gantry_core::domain::alert::AlertSeverity;
use tracing::{error, info, warn};

/// Receives user-visible alerts raised while tracking runs
pub trait AlertSink: Send + Sync {
    /// Surfaces one alert to the caller
    fn alert(&self, message: &str, severity: AlertSeverity);
}

/// Alert sink that forwards alerts to the tracing subscriber
///
/// Suits headless deployments where alerts land in the log stream.
#[derive(Debug, Clone, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn alert(&self, message: &str, severity: AlertSeverity) {
        match severity {
            AlertSeverity::Danger => error!("{}", message),
            AlertSeverity::Warning => warn!("{}", message),
            AlertSeverity::Default | AlertSeverity::Success => info!("{}", message),
        }
    }
}
