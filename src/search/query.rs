//! Query matching and ranking against a built index.
//!
//! Queries are tokenized with the index's own tokenizer, matched against
//! posting lists (exact terms, plus prefix terms in typeahead mode), scored
//! with weighted TF-IDF, and returned in a deterministic order.

use crate::record::{Field, Record};
use crate::search::index::{distinct_docs, DocId, InvertedIndex, Posting};
use crate::search::scoring::{compare_ranked, field_weight, idf, PREFIX_WEIGHT};

/// How multi-term queries combine per-term matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every query term must appear somewhere in the record (intersection).
    #[default]
    All,
    /// Any query term suffices (union).
    Any,
}

/// Recognized search options. Everything defaults to the conservative
/// choice: all terms required, exact matches only, unbounded results.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub match_mode: MatchMode,
    /// Additionally credit indexed terms that start with a query term, at
    /// reduced weight. Supports incremental typeahead.
    pub prefix_match: bool,
    /// Truncate the ranked results. `None` means unbounded.
    pub max_results: Option<usize>,
    /// Minimum query-term length; shorter terms are dropped before
    /// matching.
    pub min_term_length: usize,
    /// Categories to prefer, in order, among otherwise-equal scores.
    /// Empty by default: category is informational, never an implicit
    /// ranking weight.
    pub prefer_categories: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::All,
            prefix_match: false,
            max_results: None,
            min_term_length: 1,
            prefer_categories: Vec::new(),
        }
    }
}

/// One matched term within one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    /// The indexed term that matched. For prefix hits this is the full
    /// indexed term, not the query term.
    pub term: String,
    pub field: Field,
    /// Byte offsets of the occurrences within the field text.
    pub positions: Vec<usize>,
}

/// A ranked search hit: the record, its score, and the term matches the
/// snippet extractor consumes.
#[derive(Debug, Clone)]
pub struct ScoredResult {
    pub doc: DocId,
    pub record: Record,
    pub score: f32,
    pub matches: Vec<TermMatch>,
}

/// Scratch state for one candidate record during scoring.
#[derive(Debug)]
struct Candidate {
    score: f32,
    matches: Vec<TermMatch>,
    /// Number of distinct query terms this record satisfied.
    matched_terms: usize,
    /// Index of the last query term that touched this candidate; used to
    /// count each query term once even when it hits several indexed terms.
    last_term: usize,
}

impl InvertedIndex {
    /// Search the index, returning results ordered by score descending and
    /// tie-broken deterministically (category preference if configured,
    /// then record insertion order, then title).
    ///
    /// A query that tokenizes to nothing, or an index with no records,
    /// yields an empty vector. Absence of matches is never an error.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<ScoredResult> {
        let mut terms: Vec<String> = self
            .tokenizer()
            .tokenize_with_min_length(query, options.min_term_length)
            .map(|t| t.term)
            .collect();
        // Repeated query terms count once, and a canonical term order keeps
        // scores independent of query-term order.
        terms.sort_unstable();
        terms.dedup();
        if terms.is_empty() || self.record_count() == 0 {
            return Vec::new();
        }

        let mut candidates: ahash::AHashMap<DocId, Candidate> = ahash::AHashMap::new();
        for (term_idx, term) in terms.iter().enumerate() {
            if let Some(postings) = self.postings(term) {
                self.credit(&mut candidates, term_idx, term, postings, 1.0);
            }
            if options.prefix_match {
                // Exact hits were already credited above; skip them here.
                let prefixed: Vec<_> = self
                    .postings_with_prefix(term)
                    .filter(|(indexed, _)| *indexed != term.as_str())
                    .collect();
                for (indexed, postings) in prefixed {
                    self.credit(&mut candidates, term_idx, indexed, postings, PREFIX_WEIGHT);
                }
            }
        }

        let required = match options.match_mode {
            MatchMode::All => terms.len(),
            MatchMode::Any => 1,
        };

        let mut results: Vec<ScoredResult> = candidates
            .into_iter()
            .filter(|(_, candidate)| candidate.matched_terms >= required)
            .map(|(doc, candidate)| ScoredResult {
                doc,
                record: self.record(doc).clone(),
                score: candidate.score,
                matches: candidate.matches,
            })
            .collect();

        results.sort_by(|a, b| {
            compare_ranked(
                (
                    a.score,
                    category_rank(&options.prefer_categories, &a.record),
                    a.doc,
                    a.record.title.as_str(),
                ),
                (
                    b.score,
                    category_rank(&options.prefer_categories, &b.record),
                    b.doc,
                    b.record.title.as_str(),
                ),
            )
        });

        if let Some(limit) = options.max_results {
            results.truncate(limit);
        }

        tracing::debug!(
            "Query {:?}: {} terms, {} results",
            query,
            terms.len(),
            results.len()
        );
        results
    }

    /// Credit every posting of one indexed term to its candidate records.
    ///
    /// `weight` discounts prefix hits relative to exact hits. Each query
    /// term bumps a candidate's matched-term count at most once, however
    /// many indexed terms it reached.
    fn credit(
        &self,
        candidates: &mut ahash::AHashMap<DocId, Candidate>,
        term_idx: usize,
        indexed_term: &str,
        postings: &[Posting],
        weight: f32,
    ) {
        let idf = idf(self.record_count(), distinct_docs(postings));
        for posting in postings {
            let contribution =
                weight * field_weight(posting.field) * posting.term_frequency() as f32 * idf;
            let candidate = candidates.entry(posting.doc).or_insert(Candidate {
                score: 0.0,
                matches: Vec::new(),
                matched_terms: 0,
                last_term: usize::MAX,
            });
            if candidate.last_term != term_idx {
                candidate.matched_terms += 1;
                candidate.last_term = term_idx;
            }
            candidate.score += contribution;
            candidate.matches.push(TermMatch {
                term: indexed_term.to_string(),
                field: posting.field,
                positions: posting.positions.clone(),
            });
        }
    }
}

fn category_rank(preferred: &[String], record: &Record) -> usize {
    preferred
        .iter()
        .position(|category| *category == record.category)
        .unwrap_or(preferred.len())
}
