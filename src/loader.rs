//! Record-table intake.
//!
//! Documentation builds emit the record table either as plain JSON or as a
//! small JavaScript file assigning the table to a global:
//!
//! ```text
//! var documenterSearchIndex = {"docs": [ {...}, ... ]};
//! ```
//!
//! Both shapes (and a bare top-level array) are accepted here. Unknown
//! fields on a record are ignored; missing string fields default to empty.
//! Validation beyond deserialization happens in the index builder.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::error::Result;
use crate::record::Record;

/// The wrapper object used by JSON and JS table files.
#[derive(Debug, Deserialize)]
struct RecordTable {
    docs: Vec<Record>,
}

/// Parse a record table from its textual form.
///
/// Accepts a `var <name> = {...};` JavaScript assignment wrapper, a bare
/// `{"docs": [...]}` object, or a bare JSON array of records.
pub fn parse_record_table(input: &str) -> Result<Vec<Record>> {
    let json = strip_assignment(input);

    if json.starts_with('[') {
        let records: Vec<Record> =
            serde_json::from_str(json).context("failed to parse record array")?;
        return Ok(records);
    }

    let table: RecordTable = serde_json::from_str(json).context("failed to parse record table")?;
    Ok(table.docs)
}

/// Read and parse a record table file.
pub fn read_record_table(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record table at {}", path.display()))?;
    let records = parse_record_table(&input)
        .with_context(|| format!("failed to parse record table at {}", path.display()))?;
    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Strip a leading `var <name> =` assignment and trailing `;`, if present.
fn strip_assignment(input: &str) -> &str {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("var ")
        .and_then(|rest| rest.split_once('='))
        .map_or(trimmed, |(_, rhs)| rhs);
    body.trim().trim_end_matches(';').trim_end()
}
