//! Head/dependent entity groups
//!
//!     A group expresses that several entities jointly describe one composite
//!     concept: one [`QueryEntity`] is the head and the remaining members are
//!     its dependents, each of which may itself be a nested group. The group's
//!     span is derived, never stored: it is the bounding span over every leaf
//!     entity reachable from the group.

use crate::core::entity::QueryEntity;
use crate::core::Span;

/// A head plus ordered dependents extracted from `[...]` markup.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityGroup {
    pub head: QueryEntity,
    pub dependents: Vec<GroupMember>,
}

/// One dependent slot of a group: a plain entity or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupMember {
    Entity(QueryEntity),
    Group(EntityGroup),
}

impl EntityGroup {
    /// The head must not reappear among the dependents.
    pub fn new(head: QueryEntity, dependents: Vec<GroupMember>) -> Self {
        debug_assert!(
            !dependents
                .iter()
                .any(|member| matches!(member, GroupMember::Entity(entity) if *entity == head)),
            "group head duplicated in dependents"
        );
        Self { head, dependents }
    }

    /// The group's declared type, which is always its head's type.
    pub fn entity_type(&self) -> &str {
        self.head.entity_type()
    }

    /// Bounding span over all reachable leaf entities.
    pub fn span(&self) -> Span {
        self.dependents
            .iter()
            .map(GroupMember::span)
            .fold(self.head.span, Span::union)
    }

    /// Every entity reachable from this group: the head plus all leaves of
    /// all dependents, in member order.
    pub fn leaf_entities(&self) -> Vec<&QueryEntity> {
        let mut leaves = vec![&self.head];
        for member in &self.dependents {
            match member {
                GroupMember::Entity(entity) => leaves.push(entity),
                GroupMember::Group(group) => leaves.extend(group.leaf_entities()),
            }
        }
        leaves
    }
}

impl GroupMember {
    pub fn span(&self) -> Span {
        match self {
            GroupMember::Entity(entity) => entity.span,
            GroupMember::Group(group) => group.span(),
        }
    }

    pub fn start(&self) -> usize {
        self.span().start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryFactory;

    #[test]
    fn test_derived_span_and_leaves() {
        let factory = QueryFactory::new();
        let query = factory.create_query("a large latte with nonfat milk please");

        let size = QueryEntity::from_query(query.clone(), Span::new(2, 6), "size");
        let product = QueryEntity::from_query(query.clone(), Span::new(8, 12), "product");
        let option = QueryEntity::from_query(query.clone(), Span::new(19, 29), "option");

        let group = EntityGroup::new(
            product.clone(),
            vec![
                GroupMember::Entity(size.clone()),
                GroupMember::Entity(option.clone()),
            ],
        );

        assert_eq!(group.span(), Span::new(2, 29));
        assert_eq!(group.entity_type(), "product");
        assert_eq!(group.leaf_entities(), vec![&product, &size, &option]);
    }

    #[test]
    fn test_nested_group_span() {
        let factory = QueryFactory::new();
        let query = factory.create_query("Order one large Tesora with medium cream");

        let quantity = QueryEntity::from_query(query.clone(), Span::new(6, 8), "quantity");
        let product = QueryEntity::from_query(query.clone(), Span::new(16, 21), "product");
        let size = QueryEntity::from_query(query.clone(), Span::new(28, 33), "size");
        let option = QueryEntity::from_query(query.clone(), Span::new(35, 39), "option");

        let inner = EntityGroup::new(option, vec![GroupMember::Entity(size)]);
        let outer = EntityGroup::new(
            product,
            vec![GroupMember::Entity(quantity), GroupMember::Group(inner)],
        );

        assert_eq!(outer.span(), Span::new(6, 39));
        assert_eq!(outer.leaf_entities().len(), 4);
    }
}
