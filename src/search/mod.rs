//! Full-text search infrastructure for documentation record tables.
//!
//! This module provides TF-IDF based search over documentation records:
//! tokenization, index construction, query matching and ranking, and
//! display-excerpt extraction.

// Module declarations
pub mod index;
pub mod query;
pub mod scoring;
pub mod snippet;
pub mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{DocId, IndexBuilder, InvertedIndex, Posting};
pub use query::{MatchMode, ScoredResult, SearchOptions, TermMatch};
pub use snippet::{DEFAULT_WINDOW, excerpt};
pub use tokenize::{Token, Tokenizer, TokenizerConfig};
