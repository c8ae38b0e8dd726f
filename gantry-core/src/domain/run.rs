//! Run domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::alert::AlertSeverity;

/// Lifecycle status of a workflow run as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Running,
    Paused,
    Completed,
    Failed,
    Canceled,
}

impl RunStatus {
    /// True while the engine may still make progress on the run.
    pub fn is_active(&self) -> bool {
        matches!(self, RunStatus::Pending | RunStatus::Running | RunStatus::Paused)
    }

    /// True when no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

/// Historical run entry returned by the engine's run-list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// Client-side classification of how a tracked run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The run reached a terminal status without task failures.
    Completed,
    /// The run ended with a mix of completed and failed tasks.
    CompletedWithFailures,
    /// The run ended with no task succeeding.
    Failed,
    /// The caller stopped tracking the run.
    Stopped,
}

impl RunOutcome {
    /// Alert severity reported for this outcome.
    pub fn severity(&self) -> AlertSeverity {
        match self {
            RunOutcome::Completed => AlertSeverity::Success,
            RunOutcome::CompletedWithFailures => AlertSeverity::Warning,
            RunOutcome::Failed => AlertSeverity::Danger,
            RunOutcome::Stopped => AlertSeverity::Warning,
        }
    }

    /// Alert message reported for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "Workflow run completed.",
            RunOutcome::CompletedWithFailures => "Workflow ran with some failed tasks.",
            RunOutcome::Failed => "Workflow run failed.",
            RunOutcome::Stopped => "Workflow run stopped.",
        }
    }
}
