//! Stale-query suppression for incremental typeahead.
//!
//! Fast keystrokes can leave several queries in flight at once; only the
//! newest one's results may reach the display. Rather than interrupting
//! running queries (the index is immutable, so they are harmless), each
//! query takes a generation token and results are checked against the
//! latest generation at the delivery boundary.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one issued query. Compare via
/// [`TypeaheadSession::deliver`]; a token is stale once a newer one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryGeneration(u64);

/// Monotonic generation counter shared by all queries of one search box.
#[derive(Debug, Default)]
pub struct TypeaheadSession {
    latest: AtomicU64,
}

impl TypeaheadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new query, superseding all previously issued generations.
    pub fn begin(&self) -> QueryGeneration {
        QueryGeneration(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `generation` is still the newest issued query.
    pub fn is_current(&self, generation: QueryGeneration) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    /// Gate results at the delivery boundary: returns the results unchanged
    /// for the newest generation, `None` for a superseded one.
    pub fn deliver<T>(&self, generation: QueryGeneration, results: T) -> Option<T> {
        self.is_current(generation).then_some(results)
    }
}
