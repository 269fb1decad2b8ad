//! Inclusive character-offset spans
//!
//!     A [`Span`] addresses a contiguous run of characters in one fixed base
//!     text. Both ends are inclusive, so a single character is `Span::new(i, i)`
//!     and `length` is `end - start + 1`. Spans are plain value types: copied,
//!     compared by equality, never mutated after creation.

use std::fmt;

/// An inclusive `[start, end]` range of character offsets into a base text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a span. `start` must not exceed `end`; an empty run of text has
    /// no span at all rather than a degenerate one.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} exceeds end {}", start, end);
        Self { start, end }
    }

    /// Number of characters covered.
    pub fn length(&self) -> usize {
        self.end - self.start + 1
    }

    /// Translate a parent-relative span into absolute coordinates.
    ///
    /// This is the only sanctioned way to move between the two coordinate
    /// systems; `parent_offset` is the absolute start of the enclosing
    /// entity's text.
    pub fn to_absolute(self, parent_offset: usize) -> Span {
        Span::new(self.start + parent_offset, self.end + parent_offset)
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one offset.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest span covering both inputs.
    pub fn union(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
