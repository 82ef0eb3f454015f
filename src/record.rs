//! Documentation record model.
//!
//! One record per page or named section/entity, as emitted by a
//! documentation build. The engine never mutates a record after intake.

use serde::{Deserialize, Serialize};

/// A single indexed unit of documentation content.
///
/// Records arrive as a batch, one table per documentation build. `location`
/// is the unique key (page URI plus optional fragment); multiple records may
/// share a `page`. Unknown extra fields on the wire are ignored during
/// deserialization, and absent string fields default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique anchor within a page, e.g. `index.html#Overview-1`.
    #[serde(default)]
    pub location: String,

    /// The containing document.
    #[serde(default)]
    pub page: String,

    /// Human-readable label for this location.
    #[serde(default)]
    pub title: String,

    /// Granularity tag. Observed values are "page", "section" and
    /// "function", but the set is not closed; the tag is carried as data
    /// and only influences ranking when the caller opts in.
    #[serde(default)]
    pub category: String,

    /// Free-form body text. Empty for navigation-only nodes.
    #[serde(default)]
    pub text: String,
}

impl Record {
    /// Whether this record carries any indexable text at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.text.is_empty()
    }
}

/// Which field of a record a term occurrence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Body,
}
