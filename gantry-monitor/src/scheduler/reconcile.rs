//! Status reconciliation
//!
//! Applies one run-status response to the node store and classifies
//! whether polling should continue. Kept free of timers and I/O so the
//! termination rules can be tested on their own.

use gantry_core::domain::run::{RunOutcome, RunStatus};
use gantry_core::domain::task::{TaskRecord, TaskStatus};
use gantry_core::dto::run::RunStatusResponse;

use crate::service::NodeStore;

/// What a completed fetch cycle means for the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The run is still in progress; keep polling
    Continue,
    /// The run ended; stop polling and report the outcome
    Finished(RunOutcome),
}

/// Applies one status response to the store
///
/// Order within a cycle is fixed: percentage overwrite, then per-task
/// updates, then the termination check. On a terminal outcome the
/// progress indicator is reset and the outcome recorded before returning.
pub fn reconcile(response: &RunStatusResponse, store: &dyn NodeStore) -> CycleOutcome {
    if let Some(percent) = response.percentage_complete {
        store.set_run_progress(percent);
    }

    for task in &response.tasks {
        apply_task(task, store);
    }

    match classify(response.status, &response.tasks) {
        Some(outcome) => {
            store.set_run_progress(0.0);
            store.set_run_outcome(outcome);
            CycleOutcome::Finished(outcome)
        }
        None => CycleOutcome::Continue,
    }
}

/// Applies a single task record to its node, if the node still exists
///
/// Tasks referencing nodes no longer present are dropped without error.
/// Subworkflow child outputs are applied before the parent node's record.
fn apply_task(task: &TaskRecord, store: &dyn NodeStore) {
    let Some(node) = store.find_node(&task.node_id) else {
        return;
    };

    if let Some(subworkflow_output) = &task.subworkflow_output {
        for (child_ref, outputs) in subworkflow_output {
            if let Some(child) = store.find_node(child_ref) {
                store.apply_subworkflow_output(&child.id, outputs.clone());
            }
        }
    }

    store.apply_task_update(
        &node.id,
        task.outputs.clone().unwrap_or_default(),
        task.error.clone(),
        task.status,
    );
}

/// Terminal classification for one response
///
/// Failure is classified before the generic terminal arm: a FAILED run, or
/// a still-RUNNING run whose tasks have all settled with at least one
/// failure, ends with a failure outcome — mixed when some tasks completed,
/// total otherwise. Any other terminal status reports success, including
/// one carrying an empty task list. An empty task list on an active run is
/// not a termination signal.
fn classify(status: RunStatus, tasks: &[TaskRecord]) -> Option<RunOutcome> {
    let all_settled = tasks.iter().all(|t| t.status.is_settled());
    let any_failed = tasks.iter().any(|t| t.status == TaskStatus::Failed);
    let any_completed = tasks.iter().any(|t| t.status == TaskStatus::Completed);

    if status == RunStatus::Failed || (all_settled && any_failed) {
        if any_completed && any_failed {
            Some(RunOutcome::CompletedWithFailures)
        } else {
            Some(RunOutcome::Failed)
        }
    } else if status.is_terminal() {
        Some(RunOutcome::Completed)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{InMemoryNodeStore, NodeStore};
    use gantry_core::domain::node::{Node, NodeConfig};
    use serde_json::json;
    use std::collections::HashMap;

    fn store_with_nodes() -> InMemoryNodeStore {
        let nodes = vec![
            Node::new("node-1", "InputNode"),
            Node::new("node-2", "SingleLLMCallNode").with_title("Summarize"),
            Node::new("node-3", "OutputNode"),
        ];
        let mut configs = HashMap::new();
        configs.insert(
            "node-3".to_string(),
            NodeConfig {
                title: Some("Deliver".to_string()),
            },
        );
        InMemoryNodeStore::with_nodes(nodes, configs)
    }

    fn task(node_id: &str, status: TaskStatus) -> TaskRecord {
        TaskRecord {
            node_id: node_id.to_string(),
            status,
            outputs: None,
            error: None,
            subworkflow_output: None,
        }
    }

    fn response(
        status: RunStatus,
        percentage_complete: Option<f32>,
        tasks: Vec<TaskRecord>,
    ) -> RunStatusResponse {
        RunStatusResponse {
            status,
            percentage_complete,
            tasks,
        }
    }

    #[test]
    fn test_running_response_keeps_polling() {
        let store = store_with_nodes();
        let outcome = reconcile(
            &response(
                RunStatus::Running,
                Some(40.0),
                vec![task("node-1", TaskStatus::Running)],
            ),
            &store,
        );

        assert_eq!(outcome, CycleOutcome::Continue);
        assert_eq!(store.run_progress(), 40.0);
        assert!(store.run_outcome().is_none());
    }

    #[test]
    fn test_percentage_is_overwritten_not_accumulated() {
        let store = store_with_nodes();
        reconcile(&response(RunStatus::Running, Some(60.0), vec![]), &store);
        reconcile(&response(RunStatus::Running, Some(30.0), vec![]), &store);

        // The backend promises monotonic progress; the client displays
        // whatever arrived last either way.
        assert_eq!(store.run_progress(), 30.0);
    }

    #[test]
    fn test_missing_percentage_leaves_value_untouched() {
        let store = store_with_nodes();
        reconcile(&response(RunStatus::Running, Some(55.0), vec![]), &store);
        reconcile(&response(RunStatus::Running, None, vec![]), &store);

        assert_eq!(store.run_progress(), 55.0);
    }

    #[test]
    fn test_terminal_status_reports_success_and_resets_progress() {
        let store = store_with_nodes();
        let outcome = reconcile(
            &response(
                RunStatus::Completed,
                Some(100.0),
                vec![task("node-1", TaskStatus::Completed)],
            ),
            &store,
        );

        assert_eq!(outcome, CycleOutcome::Finished(RunOutcome::Completed));
        assert_eq!(store.run_progress(), 0.0);
        assert_eq!(store.run_outcome(), Some(RunOutcome::Completed));
    }

    #[test]
    fn test_terminal_status_with_no_tasks_reports_success() {
        let store = store_with_nodes();
        let outcome = reconcile(&response(RunStatus::Completed, None, vec![]), &store);

        assert_eq!(outcome, CycleOutcome::Finished(RunOutcome::Completed));
    }

    #[test]
    fn test_empty_task_list_on_running_response_is_not_terminal() {
        let store = store_with_nodes();
        let outcome = reconcile(&response(RunStatus::Running, None, vec![]), &store);

        assert_eq!(outcome, CycleOutcome::Continue);
    }

    #[test]
    fn test_settled_tasks_with_mixed_results_report_partial_failure() {
        let store = store_with_nodes();
        let outcome = reconcile(
            &response(
                RunStatus::Running,
                None,
                vec![
                    task("node-1", TaskStatus::Completed),
                    task("node-2", TaskStatus::Failed),
                ],
            ),
            &store,
        );

        assert_eq!(
            outcome,
            CycleOutcome::Finished(RunOutcome::CompletedWithFailures)
        );
        assert_eq!(store.run_outcome(), Some(RunOutcome::CompletedWithFailures));
    }

    #[test]
    fn test_settled_tasks_with_only_failures_report_total_failure() {
        let store = store_with_nodes();
        let outcome = reconcile(
            &response(RunStatus::Running, None, vec![task("node-1", TaskStatus::Failed)]),
            &store,
        );

        assert_eq!(outcome, CycleOutcome::Finished(RunOutcome::Failed));
    }

    #[test]
    fn test_unsettled_task_defers_failure_classification() {
        let store = store_with_nodes();
        let outcome = reconcile(
            &response(
                RunStatus::Running,
                None,
                vec![
                    task("node-1", TaskStatus::Failed),
                    task("node-2", TaskStatus::Running),
                ],
            ),
            &store,
        );

        assert_eq!(outcome, CycleOutcome::Continue);
    }

    #[test]
    fn test_failed_status_without_failed_tasks_reports_total_failure() {
        let store = store_with_nodes();
        let outcome = reconcile(
            &response(
                RunStatus::Failed,
                None,
                vec![task("node-1", TaskStatus::Completed)],
            ),
            &store,
        );

        assert_eq!(outcome, CycleOutcome::Finished(RunOutcome::Failed));
    }

    #[test]
    fn test_task_updates_reach_resolved_nodes() {
        let store = store_with_nodes();
        let mut record = task("Summarize", TaskStatus::Completed);
        record.outputs = Some([("text".to_string(), json!("done"))].into());

        reconcile(&response(RunStatus::Running, None, vec![record]), &store);

        // Resolved through the display title, applied to the node's id.
        let node = store.find_node("node-2").unwrap();
        assert_eq!(node.data.task_status, Some(TaskStatus::Completed));
        assert_eq!(node.data.run.unwrap()["text"], json!("done"));
    }

    #[test]
    fn test_unknown_task_reference_is_dropped_without_affecting_others() {
        let store = store_with_nodes();
        let outcome = reconcile(
            &response(
                RunStatus::Running,
                None,
                vec![
                    task("ghost-node", TaskStatus::Failed),
                    task("node-1", TaskStatus::Running),
                ],
            ),
            &store,
        );

        // The ghost task neither errors nor counts toward termination of
        // the others' reconciliation.
        assert_eq!(outcome, CycleOutcome::Continue);
        assert!(store.find_node("ghost-node").is_none());
        assert_eq!(
            store.find_node("node-1").unwrap().data.task_status,
            Some(TaskStatus::Running)
        );
    }

    #[test]
    fn test_subworkflow_children_are_forced_completed() {
        let store = store_with_nodes();
        let mut record = task("node-2", TaskStatus::Running);
        record.subworkflow_output = Some(
            [(
                "Deliver".to_string(),
                [("value".to_string(), json!(9))].into(),
            )]
            .into(),
        );

        reconcile(&response(RunStatus::Running, None, vec![record]), &store);

        // Child resolved through its config title; status forced even
        // though the parent task is still running.
        let child = store.find_node("node-3").unwrap();
        assert_eq!(child.data.task_status, Some(TaskStatus::Completed));
        assert_eq!(child.data.run.unwrap()["value"], json!(9));

        let parent = store.find_node("node-2").unwrap();
        assert_eq!(parent.data.task_status, Some(TaskStatus::Running));
    }

    #[test]
    fn test_later_response_overwrites_task_fields() {
        let store = store_with_nodes();
        let mut failing = task("node-1", TaskStatus::Failed);
        failing.error = Some("boom".to_string());
        reconcile(&response(RunStatus::Running, None, vec![failing]), &store);

        reconcile(
            &response(RunStatus::Running, None, vec![task("node-1", TaskStatus::Running)]),
            &store,
        );

        let node = store.find_node("node-1").unwrap();
        assert_eq!(node.data.task_status, Some(TaskStatus::Running));
        assert!(node.data.error.is_none());
    }
}
