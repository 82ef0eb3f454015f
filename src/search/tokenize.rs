//! Text tokenization for search indexing and querying.
//!
//! Titles, bodies and queries all pass through the same tokenizer so that
//! index-time and query-time terms line up. Tokenization is pure: identical
//! input and config always yield identical output.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Common English stop words. Not filtered by default; opt in via
/// [`TokenizerConfig::stop_words`] or [`TokenizerConfig::english_stop_words`].
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Tokenizer configuration, fixed at index build time.
///
/// The built index stores a copy of this config and reuses it for queries,
/// so a query can never be tokenized differently from the index it runs
/// against.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Tokens whose folded form is shorter than this (in bytes) are
    /// discarded.
    pub min_token_length: usize,
    /// Terms dropped after case folding. Empty by default so behavior stays
    /// predictable.
    pub stop_words: BTreeSet<String>,
    /// Reduce terms to their English stem (`rust-stemmers`), so "widget"
    /// and "widgets" index identically. On by default, matching the
    /// documentation search this engine fronts; disable for literal
    /// matching.
    pub stem: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_token_length: 1,
            stop_words: BTreeSet::new(),
            stem: true,
        }
    }
}

impl TokenizerConfig {
    /// Config with the built-in English stop-word list enabled.
    pub fn english_stop_words(mut self) -> Self {
        self.stop_words
            .extend(ENGLISH_STOP_WORDS.iter().map(|w| (*w).to_string()));
        self
    }
}

/// A normalized term together with the byte offset of its first character
/// in the original input.
///
/// Offsets always point at a character boundary of the *original* string,
/// which is what the snippet extractor centers its window on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub offset: usize,
}

/// Splits raw strings into normalized terms.
///
/// Cheap to clone; the stemmer (when enabled) is shared behind an `Arc`.
#[derive(Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Arc<Stemmer>>,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        let stemmer = config
            .stem
            .then(|| Arc::new(Stemmer::create(Algorithm::English)));
        Self { config, stemmer }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenize `text` into a lazy sequence of terms.
    ///
    /// Lower-cases via `char::to_lowercase` (locale-independent Unicode
    /// fold), splits on characters that are not alphanumeric, drops tokens
    /// shorter than the configured minimum and configured stop words. Never
    /// fails: empty or symbol-only input yields an empty sequence, and the
    /// iterator restarts fresh on every call.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Token> + 'a {
        self.tokenize_with_min_length(text, self.config.min_token_length)
    }

    /// Like [`tokenize`](Self::tokenize) but with the minimum token length
    /// overridden, used when query options request a different floor.
    pub fn tokenize_with_min_length<'a>(
        &'a self,
        text: &'a str,
        min_length: usize,
    ) -> impl Iterator<Item = Token> + 'a {
        TokenIter {
            tokenizer: self,
            chars: text.char_indices(),
            text,
            min_length,
        }
    }

    /// Normalize a single word the way indexed terms are normalized.
    fn fold(&self, word: &str) -> Option<String> {
        let lowered: String = word.chars().flat_map(char::to_lowercase).collect();
        if self.config.stop_words.contains(&lowered) {
            return None;
        }
        match &self.stemmer {
            Some(stemmer) => Some(stemmer.stem(&lowered).into_owned()),
            None => Some(lowered),
        }
    }
}

struct TokenIter<'a> {
    tokenizer: &'a Tokenizer,
    chars: std::str::CharIndices<'a>,
    text: &'a str,
    min_length: usize,
}

impl Iterator for TokenIter<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            // Skip to the next alphanumeric run.
            let (start, first) = self.chars.find(|(_, c)| c.is_alphanumeric())?;
            let mut end = start + first.len_utf8();

            for (i, c) in self.chars.by_ref() {
                if c.is_alphanumeric() {
                    end = i + c.len_utf8();
                } else {
                    break;
                }
            }

            // The length floor applies to the folded term, not the raw
            // bytes; folding can change a token's length (e.g. ß → ss).
            let raw = &self.text[start..end];
            if let Some(term) = self.tokenizer.fold(raw) {
                if term.len() >= self.min_length {
                    return Some(Token {
                        term,
                        offset: start,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn terms(tokenizer: &Tokenizer, input: &str) -> Vec<String> {
        tokenizer.tokenize(input).map(|t| t.term).collect()
    }

    /// Literal tokenizer (no stemming) for tests about splitting, offsets
    /// and length filtering.
    fn literal() -> Tokenizer {
        Tokenizer::new(TokenizerConfig {
            stem: false,
            ..TokenizerConfig::default()
        })
    }

    #[rstest]
    #[case("Getting started with widgets", &["getting", "started", "with", "widgets"])]
    #[case("install the widget-package!", &["install", "the", "widget", "package"])]
    #[case("CategoricalArray{T}", &["categoricalarray", "t"])]
    #[case("levels!(x)", &["levels", "x"])]
    #[case("f(x) == 2x + 1", &["f", "x", "2x", "1"])]
    fn splits_on_non_alphanumeric(#[case] input: &str, #[case] expected: &[&str]) {
        check!(terms(&literal(), input) == expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("!!! ... ###")]
    #[case("\n\t")]
    fn symbol_only_input_yields_nothing(#[case] input: &str) {
        let tokenizer = Tokenizer::new(TokenizerConfig::default());
        check!(terms(&tokenizer, input).is_empty());
    }

    #[test]
    fn offsets_point_at_token_starts() {
        let tokens: Vec<Token> = literal().tokenize("Install the widget").collect();
        check!(tokens[0] == Token { term: "install".into(), offset: 0 });
        check!(tokens[1] == Token { term: "the".into(), offset: 8 });
        check!(tokens[2] == Token { term: "widget".into(), offset: 12 });
    }

    #[test]
    fn min_length_filters_short_tokens() {
        let config = TokenizerConfig {
            min_token_length: 3,
            stem: false,
            ..TokenizerConfig::default()
        };
        let tokenizer = Tokenizer::new(config);
        check!(terms(&tokenizer, "a an and are") == ["and", "are"]);
    }

    #[test]
    fn min_length_is_checked_after_folding() {
        let config = TokenizerConfig {
            min_token_length: 3,
            stem: false,
            ..TokenizerConfig::default()
        };
        let tokenizer = Tokenizer::new(config);
        // 'İ' is two bytes raw but lower-cases to "i\u{307}", three bytes;
        // the floor must see the folded length, not the raw one.
        check!(terms(&tokenizer, "İ ab abc") == ["i\u{307}", "abc"]);
    }

    #[test]
    fn stop_words_are_dropped_when_configured() {
        let tokenizer = Tokenizer::new(TokenizerConfig::default().english_stop_words());
        check!(terms(&tokenizer, "the quick brown fox") == ["quick", "brown", "fox"]);
    }

    #[test]
    fn stemming_unifies_variants_by_default() {
        let tokenizer = Tokenizer::new(TokenizerConfig::default());
        check!(terms(&tokenizer, "parsing widgets") == ["pars", "widget"]);
        check!(terms(&tokenizer, "widget") == terms(&tokenizer, "widgets"));
    }

    #[test]
    fn stemming_can_be_disabled() {
        check!(terms(&literal(), "parsing widgets") == ["parsing", "widgets"]);
    }

    #[rstest]
    #[case("Москва")]
    #[case("日本語のテキスト")]
    #[case("🦀 crab")]
    fn unicode_never_panics(#[case] input: &str) {
        let tokenizer = Tokenizer::new(TokenizerConfig::default());
        let _ = terms(&tokenizer, input);
    }

    #[test]
    fn restartable_and_deterministic() {
        let tokenizer = Tokenizer::new(TokenizerConfig::default());
        let input = "Install the Widget Package";
        check!(terms(&tokenizer, input) == terms(&tokenizer, input));
    }
}
