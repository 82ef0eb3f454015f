//! Inverted index construction over documentation record tables.
//!
//! The builder makes a single validating pass over the record table, then an
//! indexing pass that tokenizes each surviving record's title and body. The
//! result is an immutable snapshot: build once, share read-only with any
//! number of concurrent searches.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::BuildError;
use crate::record::{Field, Record};
use crate::search::tokenize::{Tokenizer, TokenizerConfig};

/// Identifies a record inside one index: its slot in the deduplicated table.
///
/// Slot order is the insertion order of the input sequence and is the
/// ranking tie-break of last resort.
pub type DocId = usize;

/// One term occurrence list for a single record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc: DocId,
    pub field: Field,
    /// Byte offsets of each occurrence's token start within the field text.
    pub positions: Vec<usize>,
}

impl Posting {
    /// Occurrences of the term in this record field.
    pub fn term_frequency(&self) -> usize {
        self.positions.len()
    }
}

/// An immutable inverted index over a deduplicated record table.
///
/// Posting lists are ordered by record slot (title posting before body
/// posting within a slot) and are never re-sorted after the build. The
/// tokenizer used at build time travels with the index so queries cannot
/// tokenize differently from the indexed text.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    /// Term → postings in slot order. A `BTreeMap` keeps term iteration
    /// deterministic and gives prefix lookups an ordered range scan.
    postings: BTreeMap<String, Vec<Posting>>,
    /// Surviving records; `DocId` indexes into this table.
    records: Vec<Record>,
    tokenizer: Tokenizer,
}

impl InvertedIndex {
    /// An index over zero records. Every query against it returns nothing.
    pub fn empty() -> Self {
        Self {
            postings: BTreeMap::new(),
            records: Vec::new(),
            tokenizer: Tokenizer::new(TokenizerConfig::default()),
        }
    }

    pub fn record(&self, doc: DocId) -> &Record {
        &self.records[doc]
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub(crate) fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Postings for an exact term, if any record contains it.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// All (term, postings) pairs whose term starts with `prefix`, in term
    /// order. Used by prefix-match mode for incremental typeahead.
    pub fn postings_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [Posting])> + 'a {
        self.postings
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(term, _)| term.starts_with(prefix))
            .map(|(term, list)| (term.as_str(), list.as_slice()))
    }

    /// Number of distinct records containing `term` (document frequency).
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings(term).map_or(0, distinct_docs)
    }
}

/// Distinct doc count of a slot-ordered posting list. A doc contributes at
/// most two adjacent postings (title, then body).
pub(crate) fn distinct_docs(postings: &[Posting]) -> usize {
    let mut count = 0;
    let mut last = None;
    for posting in postings {
        if last != Some(posting.doc) {
            count += 1;
            last = Some(posting.doc);
        }
    }
    count
}

/// Builds [`InvertedIndex`] snapshots from record tables.
///
/// Every call to [`build`](Self::build) returns a fresh structure; builders
/// share no mutable state between builds.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    tokenizer: Tokenizer,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl IndexBuilder {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config),
        }
    }

    /// Build an index from an ordered record table.
    ///
    /// A record with an empty `location` fails the whole build with
    /// [`BuildError::MalformedRecord`] naming its position in the input.
    /// Duplicate locations collapse last-write-wins: the later record
    /// replaces the earlier one in the earlier record's slot, and no
    /// postings from the replaced record survive. A record whose title and
    /// body are both empty is accepted and contributes no terms.
    pub fn build(
        &self,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<InvertedIndex, BuildError> {
        let start = std::time::Instant::now();

        // Validate and deduplicate before any tokenization, so postings for
        // replaced records are never produced in the first place.
        let mut slots: ahash::AHashMap<String, DocId> = ahash::AHashMap::new();
        let mut survivors: Vec<Record> = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            if record.location.is_empty() {
                return Err(BuildError::MalformedRecord { index });
            }
            match slots.get(&record.location) {
                Some(&slot) => survivors[slot] = record,
                None => {
                    slots.insert(record.location.clone(), survivors.len());
                    survivors.push(record);
                }
            }
        }

        let mut postings: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        for (doc, record) in survivors.iter().enumerate() {
            self.index_field(&mut postings, doc, Field::Title, &record.title);
            self.index_field(&mut postings, doc, Field::Body, &record.text);
        }

        let index = InvertedIndex {
            postings,
            records: survivors,
            tokenizer: self.tokenizer.clone(),
        };

        tracing::info!(
            "Built search index: {} records, {} unique terms in {:?}",
            index.record_count(),
            index.term_count(),
            start.elapsed()
        );

        Ok(index)
    }

    /// Tokenize one field and append its occurrences to the posting lists.
    ///
    /// Records are processed in slot order and title before body, so a new
    /// occurrence either extends the last posting of its term or starts a
    /// new one; lists stay sorted without a re-sort.
    fn index_field(
        &self,
        postings: &mut BTreeMap<String, Vec<Posting>>,
        doc: DocId,
        field: Field,
        text: &str,
    ) {
        for token in self.tokenizer.tokenize(text) {
            let list = postings.entry(token.term).or_default();
            match list.last_mut() {
                Some(last) if last.doc == doc && last.field == field => {
                    last.positions.push(token.offset);
                }
                _ => list.push(Posting {
                    doc,
                    field,
                    positions: vec![token.offset],
                }),
            }
        }
    }
}
