//! Snapshot - a normalized serializable representation of a processed query
//!
//!     This module provides a canonical, format-agnostic representation of a
//!     [`ProcessedQuery`] suitable for serialization to any output format
//!     (JSON, YAML, ...). Output code should consume
//!     [`snapshot_from_query`] rather than walking the model itself: the
//!     model carries query handles and lazy caches that have no place on the
//!     wire, and the traversal (span translation, value flattening) lives in
//!     one spot.

use serde::{Deserialize, Serialize};

use crate::core::entity::{EntityValue, NestedEntity, QueryEntity};
use crate::core::group::{EntityGroup, GroupMember};
use crate::core::processed::ProcessedQuery;
use crate::core::Span;

/// Serializable form of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSnapshot {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for SpanSnapshot {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// Serializable form of an entity, absolute or parent-relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    pub span: SpanSnapshot,
    /// Absolute start of the enclosing entity; present on nested entities only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_offset: Option<usize>,
    /// Opaque recognizer payload, reproduced unchanged.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<EntitySnapshot>,
}

/// Serializable form of an entity group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub span: SpanSnapshot,
    pub head: EntitySnapshot,
    pub dependents: Vec<GroupMemberSnapshot>,
}

/// One dependent slot: an entity or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupMemberSnapshot {
    Group(GroupSnapshot),
    Entity(EntitySnapshot),
}

/// Serializable form of a whole processed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySnapshot {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub intent: Option<String>,
    pub entities: Vec<EntitySnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub entity_groups: Vec<GroupSnapshot>,
}

/// Create a snapshot of a processed query and everything it contains.
pub fn snapshot_from_query(processed: &ProcessedQuery) -> QuerySnapshot {
    QuerySnapshot {
        text: processed.query.text().to_string(),
        domain: processed.domain.clone(),
        intent: processed.intent.clone(),
        entities: processed.entities.iter().map(snapshot_entity).collect(),
        entity_groups: processed
            .entity_groups
            .iter()
            .map(snapshot_group)
            .collect(),
    }
}

fn snapshot_entity(entity: &QueryEntity) -> EntitySnapshot {
    let (value, children) = snapshot_value(&entity.entity.value);
    EntitySnapshot {
        text: entity.text().to_string(),
        entity_type: entity.entity_type().to_string(),
        role: entity.entity.role.clone(),
        span: entity.span.into(),
        parent_offset: None,
        value,
        children,
    }
}

fn snapshot_nested(nested: &NestedEntity) -> EntitySnapshot {
    let (value, children) = snapshot_value(&nested.entity.value);
    EntitySnapshot {
        text: nested.text().to_string(),
        entity_type: nested.entity_type().to_string(),
        role: nested.entity.role.clone(),
        span: nested.span.into(),
        parent_offset: Some(nested.parent_offset),
        value,
        children,
    }
}

fn snapshot_value(
    value: &Option<EntityValue>,
) -> (Option<serde_json::Value>, Vec<EntitySnapshot>) {
    match value {
        Some(EntityValue::Resolved(payload)) => (Some(payload.clone()), Vec::new()),
        Some(EntityValue::Children(children)) => {
            (None, children.iter().map(snapshot_nested).collect())
        }
        None => (None, Vec::new()),
    }
}

fn snapshot_group(group: &EntityGroup) -> GroupSnapshot {
    GroupSnapshot {
        entity_type: group.entity_type().to_string(),
        span: group.span().into(),
        head: snapshot_entity(&group.head),
        dependents: group
            .dependents
            .iter()
            .map(|member| match member {
                GroupMember::Entity(entity) => GroupMemberSnapshot::Entity(snapshot_entity(entity)),
                GroupMember::Group(nested) => GroupMemberSnapshot::Group(snapshot_group(nested)),
            })
            .collect(),
    }
}
