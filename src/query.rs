//! Query handle and text normalization
//!
//!     The markup engine does not construct queries itself; it asks a
//!     [`QueryFactory`] to materialize one [`Query`] per load, then addresses
//!     the query's raw text through character spans. The query also provides
//!     the normalized rendering of any span's substring, which entities expose
//!     lazily as `normalized_text`.
//!
//! Normalization rules
//!
//!     Normalization is intentionally small and documented here in full:
//!
//!         1. lowercase the text
//!         2. a period adjacent to a single letter becomes a space, so
//!            "s.o.b." -> "s o b" and "8 p.m." -> "8 p m"
//!         3. whitespace runs collapse to a single space
//!         4. leading and trailing whitespace is trimmed
//!
//!     Offsets are never affected: normalization applies to an extracted
//!     substring, and the span coordinate system always refers to the raw
//!     text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::core::Span;

static SINGLE_LETTER_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z])\.").expect("invalid period pattern"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace pattern"));

/// An immutable raw query text with character-offset addressing.
#[derive(Debug, PartialEq, Eq)]
pub struct Query {
    text: String,
}

impl Query {
    fn new(text: String) -> Self {
        Self { text }
    }

    /// The raw query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the raw text in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The substring covered by an absolute span.
    pub fn span_text(&self, span: &Span) -> String {
        self.text
            .chars()
            .skip(span.start)
            .take(span.length())
            .collect()
    }

    /// The normalized rendering of an absolute span's substring.
    pub fn normalized_span_text(&self, span: &Span) -> String {
        normalize(&self.span_text(span))
    }
}

/// Apply the normalization rules to a piece of text.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spaced = SINGLE_LETTER_PERIOD.replace_all(&lowered, "${1} ");
    let collapsed = WHITESPACE_RUN.replace_all(&spaced, " ");
    collapsed.trim().to_string()
}

/// Produces query handles from raw text.
///
/// The factory exists as a seam: richer deployments construct queries with
/// tokenizers and resolvers behind the same call. The markup engine only ever
/// calls [`QueryFactory::create_query`], exactly once per load.
#[derive(Debug, Clone, Default)]
pub struct QueryFactory;

impl QueryFactory {
    pub fn new() -> Self {
        Self
    }

    /// Materialize a query over the given raw text.
    pub fn create_query(&self, text: impl Into<String>) -> Arc<Query> {
        Arc::new(Query::new(text.into()))
    }
}
