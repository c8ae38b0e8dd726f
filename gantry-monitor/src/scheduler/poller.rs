//! Run status poller
//!
//! Polls the engine for the status of a single run and reconciles each
//! response into the node store until the run settles. Owns at most one
//! polling timer; every termination path releases it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error};

use gantry_client::EngineClient;
use gantry_core::domain::run::RunOutcome;
use gantry_core::dto::run::RunStatusResponse;

use crate::scheduler::reconcile::{CycleOutcome, reconcile};
use crate::service::{AlertSink, NodeStore};

/// Source of run-status responses
///
/// The poller fetches through this seam so tests can drive it with a
/// scripted backend.
#[async_trait]
pub trait RunStatusSource: Send + Sync {
    /// Fetches the current status of a run
    async fn fetch_status(&self, run_id: &str) -> anyhow::Result<RunStatusResponse>;
}

#[async_trait]
impl RunStatusSource for EngineClient {
    async fn fetch_status(&self, run_id: &str) -> anyhow::Result<RunStatusResponse> {
        Ok(self.run_status(run_id).await?)
    }
}

/// Per-run status poller
///
/// `start` replaces any polling already in flight, so a poller owns at
/// most one active timer. The timer is released on explicit stop, on
/// restart, on fetch failure, and on every terminal reconciliation
/// outcome.
pub struct RunStatusPoller {
    source: Arc<dyn RunStatusSource>,
    store: Arc<dyn NodeStore>,
    alerts: Arc<dyn AlertSink>,
    interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
    generation: Arc<AtomicU64>,
}

impl RunStatusPoller {
    /// Creates a new poller
    pub fn new(
        source: Arc<dyn RunStatusSource>,
        store: Arc<dyn NodeStore>,
        alerts: Arc<dyn AlertSink>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            alerts,
            interval,
            handle: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Begins polling `run_id`, cancelling any polling already in flight
    pub fn start(&self, run_id: &str) {
        let mut handle = self.handle.lock().unwrap();
        if let Some(old) = handle.take() {
            old.abort();
        }

        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let run_id = run_id.to_string();
        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let alerts = Arc::clone(&self.alerts);
        let live_generation = Arc::clone(&self.generation);
        let interval = self.interval;

        *handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            // A slow fetch delays the next tick instead of overlapping it.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if live_generation.load(Ordering::SeqCst) != my_generation {
                    break;
                }

                let response = match source.fetch_status(&run_id).await {
                    Ok(response) => response,
                    Err(e) => {
                        // Fail fast: a transport or parse failure ends this
                        // run's polling without an alert.
                        error!("Error fetching status for run {}: {:#}", run_id, e);
                        break;
                    }
                };

                // A response that raced with stop() or a restart is dropped.
                if live_generation.load(Ordering::SeqCst) != my_generation {
                    break;
                }

                match reconcile(&response, store.as_ref()) {
                    CycleOutcome::Continue => {
                        debug!("Run {} still in progress", run_id);
                    }
                    CycleOutcome::Finished(outcome) => {
                        alerts.alert(outcome.message(), outcome.severity());
                        break;
                    }
                }
            }
        }));
    }

    /// Stops polling and resets the progress indicator
    ///
    /// Safe to call at any time: the stop notice fires on every call, the
    /// timer cancellation happens at most once.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
        }

        self.store.set_run_progress(0.0);
        self.store.set_run_outcome(RunOutcome::Stopped);
        self.alerts
            .alert(RunOutcome::Stopped.message(), RunOutcome::Stopped.severity());
    }

    /// True while a polling timer is registered and has not finished
    pub fn is_active(&self) -> bool {
        self.handle
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Waits for the active polling task, if any, to finish
    pub async fn join(&self) {
        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::InMemoryNodeStore;
    use gantry_core::domain::alert::AlertSeverity;
    use gantry_core::domain::node::Node;
    use gantry_core::domain::run::RunStatus;
    use gantry_core::domain::task::{TaskRecord, TaskStatus};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    struct ScriptedSource {
        script: Mutex<Vec<RunStatusResponse>>,
        fetches: AtomicUsize,
    }

    impl ScriptedSource {
        /// Returns responses in order, repeating the last one once the
        /// script is exhausted.
        fn new(script: Vec<RunStatusResponse>) -> Self {
            Self {
                script: Mutex::new(script),
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RunStatusSource for ScriptedSource {
        async fn fetch_status(&self, _run_id: &str) -> anyhow::Result<RunStatusResponse> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                Ok(script.remove(0))
            } else {
                script
                    .first()
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("script exhausted"))
            }
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RunStatusSource for FailingSource {
        async fn fetch_status(&self, _run_id: &str) -> anyhow::Result<RunStatusResponse> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    struct PerRunSource {
        counts: Mutex<HashMap<String, usize>>,
    }

    impl PerRunSource {
        fn new() -> Self {
            Self {
                counts: Mutex::new(HashMap::new()),
            }
        }

        fn count(&self, run_id: &str) -> usize {
            *self.counts.lock().unwrap().get(run_id).unwrap_or(&0)
        }
    }

    #[async_trait]
    impl RunStatusSource for PerRunSource {
        async fn fetch_status(&self, run_id: &str) -> anyhow::Result<RunStatusResponse> {
            *self.counts.lock().unwrap().entry(run_id.to_string()).or_insert(0) += 1;
            Ok(running(Some(10.0), vec![]))
        }
    }

    struct RecordingAlerts {
        events: Mutex<Vec<(String, AlertSeverity)>>,
    }

    impl RecordingAlerts {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<(String, AlertSeverity)> {
            self.events.lock().unwrap().clone()
        }
    }

    impl AlertSink for RecordingAlerts {
        fn alert(&self, message: &str, severity: AlertSeverity) {
            self.events
                .lock()
                .unwrap()
                .push((message.to_string(), severity));
        }
    }

    fn running(percentage_complete: Option<f32>, tasks: Vec<TaskRecord>) -> RunStatusResponse {
        RunStatusResponse {
            status: RunStatus::Running,
            percentage_complete,
            tasks,
        }
    }

    fn completed() -> RunStatusResponse {
        RunStatusResponse {
            status: RunStatus::Completed,
            percentage_complete: Some(100.0),
            tasks: vec![TaskRecord {
                node_id: "node-1".to_string(),
                status: TaskStatus::Completed,
                outputs: None,
                error: None,
                subworkflow_output: None,
            }],
        }
    }

    fn poller_with(
        source: Arc<dyn RunStatusSource>,
    ) -> (RunStatusPoller, Arc<InMemoryNodeStore>, Arc<RecordingAlerts>) {
        let store = Arc::new(InMemoryNodeStore::with_nodes(
            vec![Node::new("node-1", "InputNode")],
            HashMap::new(),
        ));
        let alerts = Arc::new(RecordingAlerts::new());
        let poller = RunStatusPoller::new(
            source,
            store.clone(),
            alerts.clone(),
            Duration::from_millis(10),
        );
        (poller, store, alerts)
    }

    #[tokio::test]
    async fn test_poller_stops_after_terminal_response() {
        let source = Arc::new(ScriptedSource::new(vec![
            running(Some(50.0), vec![]),
            completed(),
        ]));
        let (poller, store, alerts) = poller_with(source.clone());

        poller.start("run-1");
        poller.join().await;

        assert!(!poller.is_active());
        assert_eq!(store.run_progress(), 0.0);
        assert_eq!(store.run_outcome(), Some(RunOutcome::Completed));
        assert_eq!(
            alerts.events(),
            vec![(
                "Workflow run completed.".to_string(),
                AlertSeverity::Success
            )]
        );
        // One fetch per response, nothing after the terminal one.
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_poller_keeps_polling_while_running() {
        let source = Arc::new(ScriptedSource::new(vec![running(Some(30.0), vec![])]));
        let (poller, store, alerts) = poller_with(source.clone());

        poller.start("run-1");
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(poller.is_active());
        assert!(source.fetch_count() >= 2);
        assert_eq!(store.run_progress(), 30.0);
        assert!(alerts.events().is_empty());

        poller.stop();
    }

    #[tokio::test]
    async fn test_stop_resets_progress_and_notifies() {
        let source = Arc::new(ScriptedSource::new(vec![running(Some(30.0), vec![])]));
        let (poller, store, alerts) = poller_with(source);

        poller.start("run-1");
        tokio::time::sleep(Duration::from_millis(50)).await;
        poller.stop();

        assert!(!poller.is_active());
        assert_eq!(store.run_progress(), 0.0);
        assert_eq!(store.run_outcome(), Some(RunOutcome::Stopped));
        assert_eq!(
            alerts.events(),
            vec![("Workflow run stopped.".to_string(), AlertSeverity::Warning)]
        );
    }

    #[tokio::test]
    async fn test_stop_twice_is_safe() {
        let source = Arc::new(ScriptedSource::new(vec![running(None, vec![])]));
        let (poller, _store, alerts) = poller_with(source.clone());

        poller.start("run-1");
        tokio::time::sleep(Duration::from_millis(30)).await;
        poller.stop();
        let fetches_after_stop = source.fetch_count();
        poller.stop();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!poller.is_active());
        // The second stop repeats the notice but cancels nothing.
        assert_eq!(alerts.events().len(), 2);
        assert_eq!(source.fetch_count(), fetches_after_stop);
    }

    #[tokio::test]
    async fn test_restart_replaces_the_active_timer() {
        let source = Arc::new(PerRunSource::new());
        let (poller, _store, _alerts) = poller_with(source.clone());

        poller.start("run-1");
        tokio::time::sleep(Duration::from_millis(50)).await;
        poller.start("run-2");
        tokio::time::sleep(Duration::from_millis(30)).await;

        let run_1_fetches = source.count("run-1");
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The first run's loop is gone; only run-2 keeps fetching.
        assert_eq!(source.count("run-1"), run_1_fetches);
        assert!(source.count("run-2") >= 2);
        assert!(poller.is_active());

        poller.stop();
    }

    #[tokio::test]
    async fn test_fetch_failure_cancels_without_alert() {
        let (poller, store, alerts) = poller_with(Arc::new(FailingSource));

        poller.start("run-1");
        poller.join().await;

        assert!(!poller.is_active());
        assert!(alerts.events().is_empty());
        assert!(store.run_outcome().is_none());
    }

    #[tokio::test]
    async fn test_response_racing_with_stop_is_dropped() {
        struct SlowSource;

        #[async_trait]
        impl RunStatusSource for SlowSource {
            async fn fetch_status(&self, _run_id: &str) -> anyhow::Result<RunStatusResponse> {
                tokio::time::sleep(Duration::from_millis(80)).await;
                Ok(completed())
            }
        }

        let (poller, store, alerts) = poller_with(Arc::new(SlowSource));

        poller.start("run-1");
        // Stop while the first fetch is still in flight.
        tokio::time::sleep(Duration::from_millis(20)).await;
        poller.stop();
        tokio::time::sleep(Duration::from_millis(120)).await;

        // The late response must not produce a completion alert or outcome.
        assert_eq!(store.run_outcome(), Some(RunOutcome::Stopped));
        assert_eq!(
            alerts.events(),
            vec![("Workflow run stopped.".to_string(), AlertSeverity::Warning)]
        );
    }
}
