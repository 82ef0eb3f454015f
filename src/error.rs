//! Error handling types and utilities.

/// A specialized Result type for docfind operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()`
/// and `.with_context()` methods at the IO boundaries.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when building an index from a record table fails.
///
/// Build problems are fatal to the whole build call: a structurally bad
/// table must not produce an index that silently ranks wrong later.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A record lacks a usable `location`. Carries the record's position
    /// in the input sequence so the producer can find it.
    #[error("record at index {index} has an empty location")]
    MalformedRecord { index: usize },
}
