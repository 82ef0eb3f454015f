//! docfind: an in-memory search index and query engine for documentation
//! record tables.
//!
//! A documentation build hands over a flat table of records (location,
//! page, title, category, body text); docfind builds an immutable inverted
//! index from it and answers ranked TF-IDF queries with display excerpts.
//! See [`search::IndexBuilder`] for the build entry point,
//! [`search::InvertedIndex::search`] for queries, and [`engine::SearchEngine`]
//! for the async snapshot-owning front-end.

pub mod engine;
pub mod error;
pub mod loader;
pub mod record;
pub mod search;
pub mod tracing;
pub mod typeahead;

pub use engine::SearchEngine;
pub use error::{BuildError, Result};
pub use record::{Field, Record};
pub use search::{
    DocId, IndexBuilder, InvertedIndex, MatchMode, ScoredResult, SearchOptions, TermMatch,
    Tokenizer, TokenizerConfig, excerpt,
};
pub use typeahead::{QueryGeneration, TypeaheadSession};
