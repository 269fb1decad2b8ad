//! Typed entities with absolute or parent-relative placement
//!
//!     An [`Entity`] is the placement-free payload: a piece of text, a type
//!     label, an optional role, and an optional structured value. Placement
//!     comes in two flavors:
//!
//!         - [`QueryEntity`] anchors an entity by an absolute span into the
//!           query's raw text;
//!         - [`NestedEntity`] anchors an entity relative to the text of the
//!           entity that encloses it, carrying the `parent_offset` needed to
//!           translate back into absolute coordinates.
//!
//!     Values are opaque to the engine except for one reserved shape: the
//!     [`EntityValue::Children`] variant that records entities nested via
//!     curly-brace markup. Anything a recognizer resolved (currency amounts,
//!     times, numbers) rides along unchanged in [`EntityValue::Resolved`].

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::core::Span;
use crate::query::Query;

/// A typed, optionally role-labeled, optionally valued piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub text: String,
    pub entity_type: String,
    pub role: Option<String>,
    pub value: Option<EntityValue>,
}

impl Entity {
    pub fn new(text: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity_type: entity_type.into(),
            role: None,
            value: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_value(mut self, value: EntityValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Entities nested inside this entity's text, if any.
    pub fn children(&self) -> &[NestedEntity] {
        match &self.value {
            Some(EntityValue::Children(children)) => children,
            _ => &[],
        }
    }
}

/// The structured value attached to an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityValue {
    /// Entities nested via curly-brace markup, in order of appearance.
    /// This is the single value shape the engine itself constructs.
    Children(Vec<NestedEntity>),
    /// Payload produced by an external recognizer (e.g. `{"unit": "$",
    /// "value": 600000}`), stored and reproduced unchanged.
    Resolved(serde_json::Value),
}

/// An entity anchored by an absolute span into a query's raw text.
///
/// Equality considers type, span, and text only: two loads of the same
/// annotation compare equal regardless of value payloads or cached
/// normalization state.
#[derive(Debug, Clone)]
pub struct QueryEntity {
    query: Arc<Query>,
    pub entity: Entity,
    pub span: Span,
    normalized: OnceCell<String>,
}

impl QueryEntity {
    /// Anchor a fresh entity of the given type; its text is the span's
    /// substring of the query.
    pub fn from_query(query: Arc<Query>, span: Span, entity_type: impl Into<String>) -> Self {
        let text = query.span_text(&span);
        Self::from_entity(query, span, Entity::new(text, entity_type))
    }

    /// Anchor an already-built entity (e.g. one carrying a value).
    pub fn from_entity(query: Arc<Query>, span: Span, entity: Entity) -> Self {
        Self {
            query,
            entity,
            span,
            normalized: OnceCell::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.entity.text
    }

    pub fn entity_type(&self) -> &str {
        &self.entity.entity_type
    }

    pub fn role(&self) -> Option<&str> {
        self.entity.role.as_deref()
    }

    pub fn query(&self) -> &Arc<Query> {
        &self.query
    }

    /// Normalized rendering of this entity's text, computed on first use.
    /// Not part of the entity's identity.
    pub fn normalized_text(&self) -> &str {
        self.normalized
            .get_or_init(|| self.query.normalized_span_text(&self.span))
    }
}

impl PartialEq for QueryEntity {
    fn eq(&self, other: &Self) -> bool {
        self.entity.entity_type == other.entity.entity_type
            && self.span == other.span
            && self.entity.text == other.entity.text
    }
}

impl Eq for QueryEntity {}

/// An entity anchored relative to an enclosing entity's text.
///
/// `span` addresses characters of the *parent's* text; `parent_offset` is the
/// absolute start of the parent, so the absolute placement is
/// `span.to_absolute(parent_offset)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedEntity {
    pub entity: Entity,
    pub span: Span,
    pub parent_offset: usize,
}

impl NestedEntity {
    pub fn new(entity: Entity, span: Span, parent_offset: usize) -> Self {
        Self {
            entity,
            span,
            parent_offset,
        }
    }

    /// Anchor a fresh nested entity of the given type; its text is taken from
    /// the query at the translated absolute span.
    pub fn from_query(
        query: &Query,
        span: Span,
        parent_offset: usize,
        entity_type: impl Into<String>,
    ) -> Self {
        let text = query.span_text(&span.to_absolute(parent_offset));
        Self::new(Entity::new(text, entity_type), span, parent_offset)
    }

    pub fn text(&self) -> &str {
        &self.entity.text
    }

    pub fn entity_type(&self) -> &str {
        &self.entity.entity_type
    }

    pub fn absolute_span(&self) -> Span {
        self.span.to_absolute(self.parent_offset)
    }
}
