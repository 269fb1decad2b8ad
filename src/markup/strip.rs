//! Mark-down: strip annotation syntax without building the model
//!
//!     Some consumers only want the plain query text. Mark-down repeatedly
//!     replaces every innermost fully-balanced `{content|type}`,
//!     `{content|type|role}`, or `[content|type]` with its content until a
//!     fixpoint is reached, which projects the markup grammar onto its
//!     literal productions. No offsets are computed and nothing can fail:
//!     unmatched brackets simply survive the strip.

use once_cell::sync::Lazy;
use regex::Regex;

// Innermost constructs only: content may not contain markup characters.
static INNER_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}\[\]|]*)\|[^{}\[\]|]*(?:\|[^{}\[\]|]*)?\}")
        .expect("invalid entity pattern")
});
static INNER_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^{}\[\]|]*)\|[^{}\[\]|]*\]").expect("invalid group pattern"));

/// Strip all annotation syntax from markup text, keeping only the literal
/// content. Total: malformed input yields a best-effort strip.
pub fn mark_down(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let after_entities = INNER_ENTITY.replace_all(&current, "${1}");
        let after_groups = INNER_GROUP.replace_all(&after_entities, "${1}");
        if after_groups == current {
            return current;
        }
        current = after_groups.into_owned();
    }
}
