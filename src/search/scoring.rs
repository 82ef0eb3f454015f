//! Relevance scoring and result ordering.
//!
//! Scores follow a weighted TF-IDF: per matched term,
//! `field_weight × term_frequency × idf`, summed over matches. Title
//! occurrences outrank body occurrences, and terms present in most records
//! are discounted.

use std::cmp::Ordering;

use crate::record::Field;

/// Weight multiplier for a title occurrence. Strictly greater than
/// [`BODY_WEIGHT`]: a record matching in its title must score at least as
/// high as one matching the same term only in its body.
pub const TITLE_WEIGHT: f32 = 2.0;

/// Weight multiplier for a body occurrence.
pub const BODY_WEIGHT: f32 = 1.0;

/// Discount applied to prefix (non-exact) term matches in typeahead mode.
pub const PREFIX_WEIGHT: f32 = 0.5;

pub fn field_weight(field: Field) -> f32 {
    match field {
        Field::Title => TITLE_WEIGHT,
        Field::Body => BODY_WEIGHT,
    }
}

/// Inverse document frequency: `ln(1 + total_records / records_with_term)`.
///
/// Always positive for a term that occurs at all, so every match
/// contributes some score; terms appearing in most records contribute the
/// least.
pub fn idf(total_records: usize, records_with_term: usize) -> f32 {
    if records_with_term == 0 {
        return 0.0;
    }
    (1.0 + total_records as f32 / records_with_term as f32).ln()
}

/// Ordering for ranked results.
///
/// Higher score first, then the caller's category preference (if any), then
/// record insertion order, then lexicographic title. Insertion order is
/// already total within one index, so the title comparison only
/// distinguishes results merged from different indexes.
pub fn compare_ranked(
    (score_a, category_rank_a, doc_a, title_a): (f32, usize, usize, &str),
    (score_b, category_rank_b, doc_b, title_b): (f32, usize, usize, &str),
) -> Ordering {
    score_b
        .total_cmp(&score_a)
        .then_with(|| category_rank_a.cmp(&category_rank_b))
        .then_with(|| doc_a.cmp(&doc_b))
        .then_with(|| title_a.cmp(title_b))
}
