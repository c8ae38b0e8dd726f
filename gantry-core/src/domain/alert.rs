//! Alert severities

use serde::{Deserialize, Serialize};

/// Severity attached to caller-facing alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Default,
    Success,
    Warning,
    Danger,
}
