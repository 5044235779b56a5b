//! Background worker that keeps query results current for an interactive view
//!
//! Filter states are submitted as the user edits them. The worker waits for
//! a quiet period before querying, and a result whose state was superseded
//! while it was being computed is dropped (last write wins).

use crate::index::FacetIndex;
use crate::{EngineConfig, EngineError, FilterState, QueryEngine, QueryResult};
use spotter_domain::Sighting;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// A published query result and the state it was computed for
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    /// Generation of the submission this answers
    pub generation: u64,

    /// Filter state the query ran with
    pub state: FilterState,

    /// Query outcome, positions refer to [`QueryWorker::records`]
    pub result: QueryResult,
}

type Submission = Option<(u64, FilterState)>;

/// Called on the blocking thread right before a query runs
type QueryHook = Arc<dyn Fn(u64) + Send + Sync>;

/// What the worker has published so far
#[derive(Debug, Clone, Default)]
struct Published {
    snapshot: Option<Arc<QuerySnapshot>>,
    failed: Option<(u64, String)>,
}

/// Debounced query runner over a fixed snapshot
///
/// # Examples
///
/// ```no_run
/// use spotter_domain::Sighting;
/// use spotter_engine::{EngineConfig, FilterState, QueryWorker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut worker = QueryWorker::spawn(Vec::<Sighting>::new(), EngineConfig::default());
///
///     let generation = worker.submit(FilterState::new().with_search_text("787"));
///     let snapshot = worker.wait_for(generation).await?;
///     println!("{} matches", snapshot.result.len());
///
///     worker.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct QueryWorker {
    records: Arc<[Sighting]>,
    input: watch::Sender<Submission>,
    output: watch::Receiver<Published>,
    generation: u64,
    computations: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl QueryWorker {
    /// Start a worker on the current tokio runtime
    pub fn spawn(records: impl Into<Arc<[Sighting]>>, config: EngineConfig) -> Self {
        Self::spawn_with_hook(records.into(), config, None)
    }

    fn spawn_with_hook(
        records: Arc<[Sighting]>,
        config: EngineConfig,
        hook: Option<QueryHook>,
    ) -> Self {
        let (input, input_rx) = watch::channel(None);
        let (output_tx, output) = watch::channel(Published::default());
        let computations = Arc::new(AtomicU64::new(0));

        let handle = tokio::spawn(run(
            QueryEngine::new(config),
            Arc::clone(&records),
            input_rx,
            output_tx,
            Arc::clone(&computations),
            hook,
        ));

        Self {
            records,
            input,
            output,
            generation: 0,
            computations,
            handle,
        }
    }

    /// Sightings the worker queries over
    pub fn records(&self) -> &[Sighting] {
        &self.records
    }

    /// Submit a new filter state, returning its generation
    ///
    /// Any earlier submission that has not been answered yet is superseded.
    pub fn submit(&mut self, state: FilterState) -> u64 {
        self.generation += 1;
        self.input.send_replace(Some((self.generation, state)));
        self.generation
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> Option<Arc<QuerySnapshot>> {
        self.output.borrow().snapshot.clone()
    }

    /// Wait until a snapshot at least as new as `generation` is published
    ///
    /// # Errors
    /// Returns [`EngineError::Worker`] if the worker task has stopped, or if
    /// the query answering `generation` failed and nothing newer replaced it.
    pub async fn wait_for(&mut self, generation: u64) -> Result<Arc<QuerySnapshot>, EngineError> {
        loop {
            let published = self.output.borrow_and_update().clone();
            if let Some(snapshot) = published.snapshot {
                if snapshot.generation >= generation {
                    return Ok(snapshot);
                }
            }
            if let Some((failed, reason)) = published.failed {
                if failed >= generation {
                    return Err(EngineError::Worker(reason));
                }
            }
            self.output
                .changed()
                .await
                .map_err(|_| EngineError::Worker("query worker stopped".to_string()))?;
        }
    }

    /// Number of queries actually executed
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Stop the worker and wait for its task to finish
    ///
    /// # Errors
    /// Returns [`EngineError::Worker`] if the task panicked.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        drop(self.input);
        self.handle
            .await
            .map_err(|e| EngineError::Worker(format!("query worker failed: {}", e)))
    }
}

async fn run(
    engine: QueryEngine,
    records: Arc<[Sighting]>,
    mut input: watch::Receiver<Submission>,
    output: watch::Sender<Published>,
    computations: Arc<AtomicU64>,
    hook: Option<QueryHook>,
) {
    let debounce = engine.config().search_debounce();
    let index = engine
        .config()
        .use_index_for(records.len())
        .then(|| Arc::new(FacetIndex::build(&records)));

    tracing::info!(
        "Query worker started ({} sightings, debounce: {:?}, indexed: {})",
        records.len(),
        debounce,
        index.is_some()
    );

    while input.changed().await.is_ok() {
        // Restart the quiet period on every new submission
        loop {
            match timeout(debounce, input.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => {
                    tracing::info!("Query worker stopped");
                    return;
                }
                Err(_) => break,
            }
        }

        let Some((generation, state)) = input.borrow_and_update().clone() else {
            continue;
        };

        tracing::debug!("Running query for generation {}", generation);
        let engine = engine.clone();
        let records = Arc::clone(&records);
        let index = index.clone();
        let hook = hook.clone();
        let query_state = state.clone();
        let computed = tokio::task::spawn_blocking(move || {
            if let Some(hook) = hook {
                hook(generation);
            }
            match index {
                Some(index) => engine.run_indexed(&index, &query_state),
                None => engine.run(&records, &query_state),
            }
        })
        .await;
        computations.fetch_add(1, Ordering::Relaxed);

        let result = match computed {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Query for generation {} failed: {}", generation, e);
                output.send_modify(|published| {
                    published.failed = Some((generation, format!("query failed: {}", e)));
                });
                continue;
            }
        };

        if input.has_changed().unwrap_or(false) {
            tracing::debug!("Discarding superseded result for generation {}", generation);
            continue;
        }

        output.send_replace(Published {
            snapshot: Some(Arc::new(QuerySnapshot {
                generation,
                state,
                result,
            })),
            failed: None,
        });
    }

    tracing::info!("Query worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use spotter_domain::{Facet, FacetValue};
    use std::sync::Mutex;

    fn records() -> Vec<Sighting> {
        let at = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        vec![
            Sighting::new("Boeing", "787", "B789", at),
            Sighting::new("Airbus", "A350", "A359", at),
            Sighting::new("Boeing", "737", "B738", at),
        ]
    }

    #[tokio::test]
    async fn test_submit_and_wait() {
        let mut worker = QueryWorker::spawn(records(), EngineConfig::immediate());
        let state = FilterState::new()
            .with_selection(Facet::Manufacturer, FacetValue::text("Boeing"))
            .unwrap();

        let generation = worker.submit(state.clone());
        let snapshot = worker.wait_for(generation).await.unwrap();

        assert_eq!(snapshot.generation, generation);
        assert_eq!(snapshot.state, state);
        assert_eq!(snapshot.result.matched, vec![0, 2]);
        assert_eq!(snapshot.result.sightings(worker.records()).len(), 2);

        worker.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_rapid_submissions_are_debounced() {
        let config = EngineConfig {
            search_debounce_ms: 20,
            ..EngineConfig::immediate()
        };
        let mut worker = QueryWorker::spawn(records(), config);

        // No await between submissions: the worker only ever sees the last one
        worker.submit(FilterState::new().with_search_text("7"));
        worker.submit(FilterState::new().with_search_text("78"));
        let last = worker.submit(FilterState::new().with_search_text("787"));

        let snapshot = worker.wait_for(last).await.unwrap();
        assert_eq!(snapshot.generation, 3);
        assert_eq!(snapshot.result.matched, vec![0]);
        assert_eq!(worker.computations(), 1);

        worker.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_result_superseded_mid_query_is_discarded() {
        let (started_tx, mut started) = tokio::sync::mpsc::unbounded_channel();
        let (release, release_rx) = std::sync::mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);
        let hook: QueryHook = Arc::new(move |generation| {
            started_tx.send(generation).unwrap();
            release_rx.lock().unwrap().recv().unwrap();
        });
        let mut worker =
            QueryWorker::spawn_with_hook(records().into(), EngineConfig::immediate(), Some(hook));

        let first = worker.submit(FilterState::new().with_search_text("737"));
        assert_eq!(started.recv().await, Some(first));

        // A newer state arrives while the first query is still running
        let second = worker.submit(FilterState::new().with_search_text("a350"));
        release.send(()).unwrap();

        assert_eq!(started.recv().await, Some(second));
        assert!(worker.latest().is_none());
        release.send(()).unwrap();

        let snapshot = worker.wait_for(first).await.unwrap();
        assert_eq!(snapshot.generation, second);
        assert_eq!(snapshot.result.matched, vec![1]);
        assert_eq!(worker.computations(), 2);

        worker.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_query_reports_error() {
        let hook: QueryHook = Arc::new(|generation| {
            if generation == 1 {
                panic!("query blew up");
            }
        });
        let mut worker =
            QueryWorker::spawn_with_hook(records().into(), EngineConfig::immediate(), Some(hook));

        let first = worker.submit(FilterState::new());
        assert!(matches!(worker.wait_for(first).await, Err(EngineError::Worker(_))));
        assert!(worker.latest().is_none());

        // The worker keeps serving later submissions
        let second = worker.submit(FilterState::new().with_search_text("787"));
        let snapshot = worker.wait_for(second).await.unwrap();
        assert_eq!(snapshot.result.matched, vec![0]);

        worker.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_latest_is_empty_before_first_result() {
        let worker = QueryWorker::spawn(records(), EngineConfig::immediate());
        assert!(worker.latest().is_none());
        worker.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_indexed_worker() {
        let config = EngineConfig {
            index_threshold: Some(1),
            ..EngineConfig::immediate()
        };
        let mut worker = QueryWorker::spawn(records(), config);
        let generation = worker.submit(FilterState::new().with_search_text("a35"));
        let snapshot = worker.wait_for(generation).await.unwrap();
        assert_eq!(snapshot.result.matched, vec![1]);
        worker.shutdown().await.unwrap();
    }
}
