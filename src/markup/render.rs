//! Markup dumping: the exact inverse of loading
//!
//!     Dumping rebuilds a rendering forest over the raw text: every top-level
//!     group becomes a composite interval over its derived span, every
//!     top-level entity not covered by a group becomes a leaf interval, and
//!     everything between intervals is copied from the raw text verbatim.
//!     That verbatim copying is what makes the round trip byte-identical:
//!     separators such as "with", commas, and irregular whitespace are never
//!     re-synthesized, only replayed.
//!
//!     Intervals must nest fully or not touch at all. A partial overlap
//!     cannot be expressed as bracket syntax and fails the dump with a
//!     structural error; an entity lying inside a group's span is expected to
//!     be one of that group's leaves (the group renders its own members).

use crate::core::{Entity, EntityGroup, GroupMember, ProcessedQuery, QueryEntity, Span};
use crate::markup::MarkupError;

/// Serialize a processed query back into annotated markup.
///
/// Inverse of [`load_query`](crate::markup::load_query): for any query the
/// loader produced, the output is byte-identical to the original markup.
pub fn dump_query(processed: &ProcessedQuery) -> Result<String, MarkupError> {
    let chars: Vec<char> = processed.query.text().chars().collect();
    let forest = top_level_forest(processed, chars.len())?;

    let mut out = String::new();
    let mut pos = 0;
    for interval in &forest {
        let span = interval.span();
        copy_range(&chars, pos, span.start, &mut out);
        match interval {
            TopInterval::Entity(entity) => {
                render_entity(&chars, entity.span, &entity.entity, &mut out)?;
            }
            TopInterval::Group(group) => render_group(&chars, group, &mut out)?,
        }
        pos = span.end + 1;
    }
    copy_range(&chars, pos, chars.len(), &mut out);
    Ok(out)
}

enum TopInterval<'a> {
    Entity(&'a QueryEntity),
    Group(&'a EntityGroup),
}

impl TopInterval<'_> {
    fn span(&self) -> Span {
        match self {
            TopInterval::Entity(entity) => entity.span,
            TopInterval::Group(group) => group.span(),
        }
    }
}

/// Collect and validate the top-level intervals: groups first, then entities
/// not covered by any group.
fn top_level_forest(
    processed: &ProcessedQuery,
    text_len: usize,
) -> Result<Vec<TopInterval<'_>>, MarkupError> {
    let mut forest: Vec<TopInterval> = Vec::new();

    for group in &processed.entity_groups {
        let span = group.span();
        if span.end >= text_len {
            return Err(structural(format!(
                "group span {} exceeds query length {}",
                span, text_len
            )));
        }
        for other in &forest {
            if other.span().overlaps(&span) {
                return Err(structural(format!(
                    "top-level groups {} and {} overlap",
                    other.span(),
                    span
                )));
            }
        }
        forest.push(TopInterval::Group(group));
    }

    for entity in &processed.entities {
        if entity.span.end >= text_len {
            return Err(structural(format!(
                "entity span {} exceeds query length {}",
                entity.span, text_len
            )));
        }
        let mut covered = false;
        for interval in &forest {
            let group_span = interval.span();
            if group_span.contains(&entity.span) {
                covered = true;
            } else if group_span.overlaps(&entity.span) {
                return Err(structural(format!(
                    "entity span {} partially overlaps interval {}",
                    entity.span, group_span
                )));
            }
        }
        if !covered {
            forest.push(TopInterval::Entity(entity));
        }
    }

    forest.sort_by_key(|interval| interval.span().start);

    // Uncovered entities must not overlap each other either.
    for pair in forest.windows(2) {
        if pair[0].span().overlaps(&pair[1].span()) {
            return Err(structural(format!(
                "top-level intervals {} and {} overlap",
                pair[0].span(),
                pair[1].span()
            )));
        }
    }
    Ok(forest)
}

/// `{content|type}` or `{content|type|role}`; content recurses over nested
/// children when the entity's value carries them.
fn render_entity(
    chars: &[char],
    span: Span,
    entity: &Entity,
    out: &mut String,
) -> Result<(), MarkupError> {
    out.push('{');
    render_entity_content(chars, span, entity, out)?;
    out.push('|');
    out.push_str(&entity.entity_type);
    if let Some(role) = &entity.role {
        out.push('|');
        out.push_str(role);
    }
    out.push('}');
    Ok(())
}

fn render_entity_content(
    chars: &[char],
    span: Span,
    entity: &Entity,
    out: &mut String,
) -> Result<(), MarkupError> {
    let mut children: Vec<_> = entity.children().iter().collect();
    if children.is_empty() {
        copy_range(chars, span.start, span.end + 1, out);
        return Ok(());
    }
    children.sort_by_key(|child| child.span.start);

    let mut pos = span.start;
    for child in children {
        let absolute = child.absolute_span();
        if absolute.start < pos || absolute.end > span.end {
            return Err(structural(format!(
                "nested entity span {} escapes its parent {}",
                absolute, span
            )));
        }
        copy_range(chars, pos, absolute.start, out);
        render_entity(chars, absolute, &child.entity, out)?;
        pos = absolute.end + 1;
    }
    copy_range(chars, pos, span.end + 1, out);
    Ok(())
}

/// `[members and verbatim separators|type]`, members in ascending start
/// order regardless of their order in the model.
fn render_group(chars: &[char], group: &EntityGroup, out: &mut String) -> Result<(), MarkupError> {
    let mut members: Vec<GroupMember> = Vec::with_capacity(group.dependents.len() + 1);
    members.push(GroupMember::Entity(group.head.clone()));
    members.extend(group.dependents.iter().cloned());
    members.sort_by_key(GroupMember::start);

    for pair in members.windows(2) {
        if pair[0].span().overlaps(&pair[1].span()) {
            return Err(structural(format!(
                "group members {} and {} overlap",
                pair[0].span(),
                pair[1].span()
            )));
        }
    }

    let span = group.span();
    out.push('[');
    let mut pos = span.start;
    for member in &members {
        let member_span = member.span();
        copy_range(chars, pos, member_span.start, out);
        match member {
            GroupMember::Entity(entity) => {
                render_entity(chars, entity.span, &entity.entity, out)?;
            }
            GroupMember::Group(nested) => render_group(chars, nested, out)?,
        }
        pos = member_span.end + 1;
    }
    out.push('|');
    out.push_str(group.entity_type());
    out.push(']');
    Ok(())
}

/// Copy raw text characters `[from, to)` verbatim.
fn copy_range(chars: &[char], from: usize, to: usize, out: &mut String) {
    out.extend(chars[from..to].iter());
}

fn structural(message: String) -> MarkupError {
    MarkupError::Structural { message }
}
