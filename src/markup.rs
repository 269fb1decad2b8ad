//! Annotated query markup: load, dump, mark-down
//!
//!     Training data annotates a query's entities in plain text with two
//!     bracket constructs: `{...|type}` marks an entity (optionally
//!     `{...|type|role}`, and curly annotations may nest to record system
//!     entities inside a larger phrase), and `[...|type]` marks an entity
//!     group, a head/dependents relationship among the entities it contains.
//!
//!     ```text
//!     a [{large|size} {latte|product} with {nonfat milk|option}|product] please
//!     ```
//!
//!     [`load_query`] parses such markup into a span-addressed
//!     [`ProcessedQuery`](crate::core::ProcessedQuery); [`dump_query`] is its
//!     exact inverse and reproduces the original markup byte for byte,
//!     including irregular separators. [`mark_down`] strips all bracket
//!     syntax without building the model at all.
//!
//!     Offsets everywhere are character offsets into the *raw* query text,
//!     i.e. the text with all bracket syntax removed. Group annotations are
//!     transparent to offset accounting.
//!
//! Failure semantics
//!
//!     A load or dump either completes or fails atomically with a
//!     [`MarkupError`]; no partial result is ever produced and nothing is
//!     silently repaired, since spans become ground truth for model training.
//!     `mark_down` is total and never fails; on malformed input it strips
//!     what it can and leaves unmatched brackets in place.

pub mod lexing;
mod parser;
mod render;
mod strip;

use std::fmt;

pub use parser::load_query;
pub use render::dump_query;
pub use strip::mark_down;

/// Errors raised while loading or dumping annotated queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// Malformed bracket syntax: unbalanced or misplaced brackets, a missing
    /// `|type` separator, or nesting past the depth ceiling. `offset` is the
    /// character position in the markup text where the parse failed.
    Syntax { message: String, offset: usize },
    /// A group's members matched the group's declared type zero times or
    /// more than once, so no head can be resolved.
    HeadResolution { group_type: String, matches: usize },
    /// On dump: entity or group intervals partially overlap and cannot be
    /// rendered as nested brackets.
    Structural { message: String },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupError::Syntax { message, offset } => {
                write!(f, "markup syntax error at offset {}: {}", offset, message)
            }
            MarkupError::HeadResolution {
                group_type,
                matches: 0,
            } => {
                write!(f, "no member of group '{}' has the group type", group_type)
            }
            MarkupError::HeadResolution {
                group_type,
                matches,
            } => {
                write!(
                    f,
                    "{} members of group '{}' share the group type",
                    matches, group_type
                )
            }
            MarkupError::Structural { message } => {
                write!(f, "structural error: {}", message)
            }
        }
    }
}

impl std::error::Error for MarkupError {}
