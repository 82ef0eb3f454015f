//! Async front-end owning the current index snapshot.
//!
//! Builds are expensive one-time passes over the whole record table, so
//! they run on a blocking worker off the interactive path. The engine holds
//! at most one installed snapshot; a build swaps it in only on success, so
//! searches observe either the previous complete index or the new one and
//! never a partial build. Callers arriving during a build await the shared
//! build future rather than starting their own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, RwLock};

use crate::error::BuildError;
use crate::record::Record;
use crate::search::index::{IndexBuilder, InvertedIndex};
use crate::search::query::{ScoredResult, SearchOptions};
use crate::search::tokenize::TokenizerConfig;
use crate::typeahead::{QueryGeneration, TypeaheadSession};

/// Type alias for shared in-flight build futures.
type SharedBuildFuture = Shared<BoxFuture<'static, Result<Arc<InvertedIndex>, BuildError>>>;

/// Shared state for index building and querying.
///
/// This is the coordination point between the documentation-build
/// collaborator (which hands over record tables) and the display
/// collaborator (which issues queries):
/// - one immutable snapshot, swapped atomically on successful rebuild
/// - one shared future per in-flight build, awaitable by many callers
/// - a build epoch so an older build finishing late never overwrites a
///   newer build's snapshot
/// - a typeahead session gating stale results
pub struct SearchEngine {
    builder: IndexBuilder,

    /// Current snapshot, if a build has completed successfully.
    index: RwLock<Option<Arc<InvertedIndex>>>,

    /// In-flight build future tagged with its epoch (can be awaited by
    /// multiple callers).
    in_flight: Mutex<Option<(u64, SharedBuildFuture)>>,

    /// Monotonic build epoch; lets a finished build tell whether a newer
    /// one has already claimed the in-flight slot.
    build_epoch: AtomicU64,

    typeahead: TypeaheadSession,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("builder", &self.builder)
            .field("build_epoch", &self.build_epoch)
            .finish_non_exhaustive()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl SearchEngine {
    /// Create an engine with no index installed. Searches return empty
    /// results until the first successful [`rebuild`](Self::rebuild).
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            builder: IndexBuilder::new(config),
            index: RwLock::new(None),
            in_flight: Mutex::new(None),
            build_epoch: AtomicU64::new(0),
            typeahead: TypeaheadSession::new(),
        }
    }

    /// Whether a snapshot is installed.
    pub async fn has_index(&self) -> bool {
        self.index.read().await.is_some()
    }

    /// Whether a build is currently in flight.
    pub async fn is_building(&self) -> bool {
        self.in_flight.lock().await.is_some()
    }

    /// Rebuild the index from a fresh record table.
    ///
    /// The build runs on `spawn_blocking`; concurrent callers that query
    /// via [`snapshot`](Self::snapshot) during the build await its shared
    /// future. On success the new snapshot replaces the old one; on failure
    /// the previous snapshot stays installed and the error is returned.
    pub async fn rebuild(&self, records: Vec<Record>) -> Result<Arc<InvertedIndex>, BuildError> {
        let epoch = self.build_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let builder = self.builder.clone();

        let future: SharedBuildFuture = async move {
            tokio::task::spawn_blocking(move || builder.build(records).map(Arc::new))
                .await
                .expect("index build task panicked")
        }
        .boxed()
        .shared();

        {
            let mut in_flight = self.in_flight.lock().await;
            *in_flight = Some((epoch, future.clone()));
        }

        let result = future.await;

        match &result {
            Ok(index) => {
                if self.install_if_newest(epoch, index).await {
                    tracing::info!(
                        "Installed index snapshot: {} records, {} terms",
                        index.record_count(),
                        index.term_count()
                    );
                } else {
                    tracing::debug!("Discarding index from superseded build (epoch {})", epoch);
                }
            }
            Err(error) => {
                tracing::warn!("Index rebuild failed, keeping previous snapshot: {}", error);
            }
        }

        // Release the in-flight slot unless a newer build already owns it.
        {
            let mut in_flight = self.in_flight.lock().await;
            if matches!(*in_flight, Some((held, _)) if held == epoch) {
                *in_flight = None;
            }
        }

        result
    }

    /// Install a finished build's snapshot unless a newer build has begun.
    ///
    /// Builds can overlap; the epoch check keeps a slow older build from
    /// overwriting the snapshot a newer one installed. Returns whether the
    /// snapshot was installed.
    async fn install_if_newest(&self, epoch: u64, index: &Arc<InvertedIndex>) -> bool {
        let mut current = self.index.write().await;
        if self.build_epoch.load(Ordering::SeqCst) == epoch {
            *current = Some(index.clone());
            true
        } else {
            false
        }
    }

    /// The current snapshot, waiting out any in-flight build first so a
    /// caller never reads a stale snapshot while a newer one is landing.
    /// `None` until the first successful build.
    pub async fn snapshot(&self) -> Option<Arc<InvertedIndex>> {
        let pending = self.in_flight.lock().await.clone();
        if let Some((_, future)) = pending {
            // A failed build keeps the previous snapshot; nothing to do here.
            let _ = future.await;
        }
        self.index.read().await.clone()
    }

    /// Search the current snapshot. No snapshot means no data, which is an
    /// empty result, not an error.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Vec<ScoredResult> {
        match self.snapshot().await {
            Some(index) => index.search(query, options),
            None => Vec::new(),
        }
    }

    /// Begin a typeahead query, superseding earlier ones.
    pub fn begin_typeahead(&self) -> QueryGeneration {
        self.typeahead.begin()
    }

    /// Search for a typeahead keystroke. Returns `None` when the
    /// generation was superseded while the query ran; such results must be
    /// discarded, not displayed.
    pub async fn search_typeahead(
        &self,
        generation: QueryGeneration,
        query: &str,
        options: &SearchOptions,
    ) -> Option<Vec<ScoredResult>> {
        let results = self.search(query, options).await;
        self.typeahead.deliver(generation, results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn record(location: &str, title: &str, text: &str) -> Record {
        Record {
            location: location.to_string(),
            page: "Intro".to_string(),
            title: title.to_string(),
            category: "section".to_string(),
            text: text.to_string(),
        }
    }

    fn table() -> Vec<Record> {
        vec![
            record("a#1", "Introduction", "Getting started with widgets"),
            record("a#2", "Installation", "Install the widget package"),
        ]
    }

    #[tokio::test]
    async fn search_before_any_build_is_empty() {
        let engine = SearchEngine::default();
        check!(!engine.has_index().await);
        check!(engine.search("widget", &SearchOptions::default()).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rebuild_then_search() {
        let engine = SearchEngine::default();
        let index = engine.rebuild(table()).await.unwrap();
        check!(index.record_count() == 2);

        let results = engine.search("install", &SearchOptions::default()).await;
        check!(results.len() == 1);
        check!(results[0].record.location == "a#2");
        check!(!engine.is_building().await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_rebuild_keeps_previous_snapshot() {
        let engine = SearchEngine::default();
        engine.rebuild(table()).await.unwrap();

        let bad = vec![record("", "Broken", "no location")];
        let error = engine.rebuild(bad).await.unwrap_err();
        check!(error == BuildError::MalformedRecord { index: 0 });

        // Old snapshot still answers.
        let results = engine.search("widget", &SearchOptions::default()).await;
        check!(results.len() == 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_searches_share_one_snapshot() {
        let engine = Arc::new(SearchEngine::default());
        engine.rebuild(table()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine.search("widget", &SearchOptions::default()).await.len()
            }));
        }
        for handle in handles {
            check!(handle.await.unwrap() == 2);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rebuild_swaps_snapshots_atomically() {
        let engine = SearchEngine::default();
        engine.rebuild(table()).await.unwrap();
        engine
            .rebuild(vec![record("b#1", "Gadgets", "All about gadgets")])
            .await
            .unwrap();

        check!(engine.search("widget", &SearchOptions::default()).await.is_empty());
        check!(engine.search("gadgets", &SearchOptions::default()).await.len() == 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn superseded_build_does_not_overwrite_newer_snapshot() {
        let engine = SearchEngine::default();
        engine.rebuild(table()).await.unwrap();

        // An old build's epoch, claimed before a newer build began.
        let old_epoch = engine.build_epoch.load(Ordering::SeqCst);
        let newer = engine
            .rebuild(vec![record("b#1", "Gadgets", "All about gadgets")])
            .await
            .unwrap();

        let stale = engine.builder.build(table()).map(Arc::new).unwrap();
        check!(!engine.install_if_newest(old_epoch, &stale).await);

        // The newer build's snapshot is still the one installed.
        let current = engine.snapshot().await.unwrap();
        check!(Arc::ptr_eq(&current, &newer));
        check!(engine.search("gadget", &SearchOptions::default()).await.len() == 1);
    }

    #[tokio::test]
    async fn stale_typeahead_results_are_discarded() {
        let engine = SearchEngine::default();
        engine.rebuild(table()).await.unwrap();

        let stale = engine.begin_typeahead();
        let fresh = engine.begin_typeahead();

        let options = SearchOptions::default();
        check!(engine.search_typeahead(stale, "widget", &options).await.is_none());
        let delivered = engine.search_typeahead(fresh, "install", &options).await;
        check!(delivered.unwrap().len() == 1);
    }
}
