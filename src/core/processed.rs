//! The processed-query aggregate
//!
//!     A [`ProcessedQuery`] is the load result: the query handle, the flat
//!     left-to-right list of top-level entities, and the top-level entity
//!     groups. It is constructed once (by the parser, or directly by callers
//!     that only need serialization) and never mutated afterwards.
//!
//!     The optional domain and intent labels belong to the classifier layer;
//!     the markup engine neither assigns nor serializes them, it just carries
//!     them for callers that do.

use std::sync::Arc;

use crate::core::entity::QueryEntity;
use crate::core::group::EntityGroup;
use crate::query::Query;

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedQuery {
    pub query: Arc<Query>,
    pub domain: Option<String>,
    pub intent: Option<String>,
    /// Top-level entities by ascending span start, each exactly once,
    /// regardless of group membership.
    pub entities: Vec<QueryEntity>,
    /// Top-level groups in order of appearance. Every entity reachable from
    /// a group also appears in `entities`.
    pub entity_groups: Vec<EntityGroup>,
}

impl ProcessedQuery {
    pub fn new(query: Arc<Query>) -> Self {
        Self {
            query,
            domain: None,
            intent: None,
            entities: Vec::new(),
            entity_groups: Vec::new(),
        }
    }

    pub fn with_entities(mut self, entities: Vec<QueryEntity>) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_entity_groups(mut self, entity_groups: Vec<EntityGroup>) -> Self {
        self.entity_groups = entity_groups;
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }
}
