//! Shared fixtures for integration tests.

use docfind::{IndexBuilder, InvertedIndex, Record, TokenizerConfig};
use rstest::fixture;

pub fn record(location: &str, page: &str, title: &str, category: &str, text: &str) -> Record {
    Record {
        location: location.to_string(),
        page: page.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        text: text.to_string(),
    }
}

/// The two-record table from the engine's canonical walkthrough: an intro
/// section and an install section on the same page.
pub fn intro_table() -> Vec<Record> {
    vec![
        record(
            "a#1",
            "Intro",
            "Introduction",
            "section",
            "Getting started with widgets",
        ),
        record(
            "a#2",
            "Intro",
            "Installation",
            "section",
            "Install the widget package",
        ),
    ]
}

/// Index over [`intro_table`] with default tokenization, which stems, so
/// "widget" and "widgets" unify.
#[fixture]
pub fn intro_index() -> InvertedIndex {
    IndexBuilder::default().build(intro_table()).unwrap()
}

/// Index over [`intro_table`] with stemming disabled, for exercising
/// literal term matching.
#[fixture]
pub fn literal_intro_index() -> InvertedIndex {
    IndexBuilder::new(TokenizerConfig {
        stem: false,
        ..TokenizerConfig::default()
    })
    .build(intro_table())
    .unwrap()
}

/// A larger table spanning several pages and categories, handy for ranking
/// and excerpt assertions.
pub fn manual_table() -> Vec<Record> {
    vec![
        record("index.html#", "Overview", "Overview", "page", ""),
        record(
            "index.html#Overview-1",
            "Overview",
            "Overview",
            "section",
            "The package provides the widget type designed to hold categorical data \
             efficiently and conveniently. Widgets maintain a pool of levels which \
             can appear in the data, stored in a specific order.",
        ),
        record(
            "apiindex.html#Base.levels",
            "API index",
            "levels",
            "function",
            "Return the levels of a widget as they are stored internally.",
        ),
        record(
            "using.html#Using-1",
            "Using widgets",
            "Using widgets",
            "section",
            "Constructing a widget is done by passing data to the constructor. \
             Levels are extended automatically when setting an element to a level \
             not encountered before, but they are never removed without manual \
             intervention.",
        ),
    ]
}
