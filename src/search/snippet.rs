//! Display excerpt extraction for search results.
//!
//! Produces a short, human-scannable fragment of a record's body centered
//! on the earliest matched term, for the UI collaborator to render.

use crate::record::Field;
use crate::search::query::{ScoredResult, TermMatch};

/// Default excerpt window, in characters.
pub const DEFAULT_WINDOW: usize = 120;

/// Marker appended/prepended where the excerpt truncates the body.
const ELLIPSIS: char = '…';

impl ScoredResult {
    /// Display excerpt for this result. See [`excerpt`].
    pub fn excerpt(&self, window: usize) -> String {
        excerpt(&self.record.text, &self.matches, window)
    }
}

/// Build an excerpt of `text` around the earliest body match.
///
/// The window is measured in characters and trimmed to word boundaries,
/// with an ellipsis marking each truncated side. When no term matched in
/// the body (title-only hit) the leading `window` characters serve as a
/// default preview. Empty body yields an empty string; this never fails and
/// never slices inside a multi-byte character.
pub fn excerpt(text: &str, matches: &[TermMatch], window: usize) -> String {
    if text.is_empty() || window == 0 {
        return String::new();
    }

    let anchor = matches
        .iter()
        .filter(|m| m.field == Field::Body)
        .flat_map(|m| m.positions.iter().copied())
        .min();

    match anchor {
        Some(pos) if pos < text.len() => centered(text, pos, window),
        _ => leading(text, window),
    }
}

/// First `window` characters of `text`, trimmed back to a word boundary.
fn leading(text: &str, window: usize) -> String {
    let mut count = 0;
    for (offset, _) in text.char_indices() {
        if count == window {
            let head = &text[..offset];
            let cut = head.rfind(char::is_whitespace).unwrap_or(offset);
            return format!("{}{}", head[..cut].trim_end(), ELLIPSIS);
        }
        count += 1;
    }
    text.to_string()
}

/// Window of `window` characters centered on the match at byte `anchor`.
fn centered(text: &str, anchor: usize, window: usize) -> String {
    // Char-boundary table: boundaries[i] is the byte offset of the i-th
    // char; the final entry is text.len().
    let mut boundaries: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    boundaries.push(text.len());
    let char_count = boundaries.len() - 1;

    let anchor_char = match boundaries.binary_search(&anchor) {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    };

    let mut start_char = anchor_char.saturating_sub(window / 2);
    let end_char = (start_char + window).min(char_count);
    // Re-anchor at the end of short tails so the window stays full.
    if end_char == char_count {
        start_char = char_count.saturating_sub(window);
    }

    let mut start = boundaries[start_char];
    let mut end = boundaries[end_char];

    // Trim partial words at the truncated edges, but never trim away the
    // matched term itself.
    if start_char > 0 {
        if let Some(ws) = text[start..end].find(char::is_whitespace) {
            if start + ws < anchor {
                start += ws;
            }
        }
    }
    if end_char < char_count {
        if let Some(ws) = text[start..end].rfind(char::is_whitespace) {
            if start + ws > anchor {
                end = start + ws;
            }
        }
    }

    let body = text[start..end].trim();
    let mut fragment = String::new();
    if start_char > 0 {
        fragment.push(ELLIPSIS);
    }
    fragment.push_str(body);
    if end_char < char_count {
        fragment.push(ELLIPSIS);
    }
    fragment
}
