//! Markup loading: recursive descent over the token stream
//!
//!     Loading runs in two passes. The first is a single left-to-right
//!     descent that accumulates the raw query text (markup minus all bracket
//!     syntax) while building a flat arena of tagged nodes; entity and group
//!     nodes hold their children by arena index, so the tree carries no
//!     ownership cycles and the build pass is a plain index-driven traversal.
//!     Spans recorded on entity nodes are absolute character offsets into the
//!     raw text.
//!
//!     The second pass materializes the query (exactly one factory call, on
//!     the complete raw text) and walks the arena into the core model:
//!     curly-nested entities become relative-span `NestedEntity` children of
//!     their parent's value, group members are collected in order and the
//!     head is resolved by the group's declared type.
//!
//!     Failure is atomic: any error abandons the whole load.

use std::sync::Arc;

use crate::core::{Entity, EntityGroup, EntityValue, GroupMember, NestedEntity, ProcessedQuery};
use crate::core::{QueryEntity, Span};
use crate::markup::lexing::{tokenize, MarkupToken};
use crate::markup::MarkupError;
use crate::query::{Query, QueryFactory};

/// Bracket nesting ceiling. Real annotations nest two or three levels; the
/// ceiling exists to fail closed instead of overflowing the stack on
/// adversarial input.
const MAX_NESTING_DEPTH: usize = 64;

/// Parse annotated markup into a processed query.
pub fn load_query(markup: &str, factory: &QueryFactory) -> Result<ProcessedQuery, MarkupError> {
    let tokens = tokenize(markup).map_err(|offset| MarkupError::Syntax {
        message: "unrecognized input".to_string(),
        offset,
    })?;

    let mut parser = Parser::new(tokens);
    let top = parser.parse_text()?;

    let query = factory.create_query(parser.raw);
    let mut entities = Vec::new();
    let mut entity_groups = Vec::new();

    for id in top {
        match parser.arena.get(id) {
            MarkupNode::Entity(_) => {
                entities.push(build_query_entity(&parser.arena, id, &query));
            }
            MarkupNode::Group(_) => {
                entity_groups.push(build_group(&parser.arena, id, &query, &mut entities)?);
            }
        }
    }

    Ok(ProcessedQuery::new(query)
        .with_entities(entities)
        .with_entity_groups(entity_groups))
}

type NodeId = usize;

/// Intermediate parse nodes, held in a flat arena with children by index.
#[derive(Debug)]
enum MarkupNode {
    Entity(EntityNode),
    Group(GroupNode),
}

#[derive(Debug)]
struct EntityNode {
    /// Absolute span of the entity's raw text.
    span: Span,
    entity_type: String,
    role: Option<String>,
    /// Directly curly-nested entities, in order of appearance.
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct GroupNode {
    entity_type: String,
    /// Entity and group members at this nesting level, in order.
    members: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Arena {
    nodes: Vec<MarkupNode>,
}

impl Arena {
    fn push(&mut self, node: MarkupNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn get(&self, id: NodeId) -> &MarkupNode {
        &self.nodes[id]
    }

    fn entity(&self, id: NodeId) -> &EntityNode {
        match &self.nodes[id] {
            MarkupNode::Entity(node) => node,
            MarkupNode::Group(_) => unreachable!("entity node expected"),
        }
    }

    fn group(&self, id: NodeId) -> &GroupNode {
        match &self.nodes[id] {
            MarkupNode::Group(node) => node,
            MarkupNode::Entity(_) => unreachable!("group node expected"),
        }
    }
}

struct Parser<'s> {
    tokens: Vec<(MarkupToken, &'s str)>,
    pos: usize,
    /// Raw query text accumulated so far.
    raw: String,
    /// Character offset of the next raw-text character (the absolute cursor).
    cursor: usize,
    /// Character offset into the markup source, for diagnostics.
    src_cursor: usize,
    arena: Arena,
}

impl<'s> Parser<'s> {
    fn new(tokens: Vec<(MarkupToken, &'s str)>) -> Self {
        Self {
            tokens,
            pos: 0,
            raw: String::new(),
            cursor: 0,
            src_cursor: 0,
            arena: Arena::default(),
        }
    }

    fn peek(&self) -> Option<MarkupToken> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    fn advance(&mut self) -> (MarkupToken, &'s str) {
        let (token, slice) = self.tokens[self.pos];
        self.pos += 1;
        self.src_cursor += slice.chars().count();
        (token, slice)
    }

    /// Consume a literal run: verbatim raw text, cursor moves by its length.
    fn take_literal(&mut self) {
        let (_, slice) = self.advance();
        self.raw.push_str(slice);
        self.cursor += slice.chars().count();
    }

    fn syntax(&self, message: impl Into<String>) -> MarkupError {
        MarkupError::Syntax {
            message: message.into(),
            offset: self.src_cursor,
        }
    }

    fn expect(&mut self, expected: MarkupToken, what: &str) -> Result<(), MarkupError> {
        match self.peek() {
            Some(token) if token == expected => {
                self.advance();
                Ok(())
            }
            Some(_) => {
                let (_, slice) = self.tokens[self.pos];
                Err(self.syntax(format!("expected {}, found '{}'", what, slice)))
            }
            None => Err(self.syntax(format!("expected {}, found end of input", what))),
        }
    }

    /// Consume the text run naming a type or role.
    fn expect_label(&mut self, what: &str) -> Result<String, MarkupError> {
        match self.peek() {
            Some(MarkupToken::Text) => {
                let (_, slice) = self.advance();
                Ok(slice.to_string())
            }
            _ => Err(self.syntax(format!("expected {} after '|'", what))),
        }
    }

    /// Top level: literals, entities, and groups until the input ends.
    fn parse_text(&mut self) -> Result<Vec<NodeId>, MarkupError> {
        let mut top = Vec::new();
        while let Some(token) = self.peek() {
            match token {
                MarkupToken::Text => self.take_literal(),
                MarkupToken::OpenEntity => top.push(self.parse_entity(1)?),
                MarkupToken::OpenGroup => top.push(self.parse_group(1)?),
                MarkupToken::CloseEntity | MarkupToken::CloseGroup | MarkupToken::Pipe => {
                    let (_, slice) = self.tokens[self.pos];
                    return Err(self.syntax(format!("unexpected '{}' outside annotation", slice)));
                }
            }
        }
        Ok(top)
    }

    /// `'{' content '|' type ('|' role)? '}'`, content = literals and nested
    /// entities only.
    fn parse_entity(&mut self, depth: usize) -> Result<NodeId, MarkupError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.syntax("annotation nesting exceeds depth ceiling"));
        }
        self.expect(MarkupToken::OpenEntity, "'{'")?;
        let start = self.cursor;
        let mut children = Vec::new();

        loop {
            match self.peek() {
                Some(MarkupToken::Text) => self.take_literal(),
                Some(MarkupToken::OpenEntity) => children.push(self.parse_entity(depth + 1)?),
                Some(MarkupToken::Pipe) => break,
                Some(MarkupToken::OpenGroup) => {
                    return Err(self.syntax("group annotation inside entity content"));
                }
                Some(MarkupToken::CloseEntity) | Some(MarkupToken::CloseGroup) => {
                    return Err(self.syntax("missing '|type' before closing bracket"));
                }
                None => return Err(self.syntax("unbalanced '{'")),
            }
        }
        self.advance(); // the pipe

        let entity_type = self.expect_label("entity type")?;
        let role = if self.peek() == Some(MarkupToken::Pipe) {
            self.advance();
            Some(self.expect_label("entity role")?)
        } else {
            None
        };
        self.expect(MarkupToken::CloseEntity, "'}'")?;

        if self.cursor == start {
            return Err(self.syntax("entity annotation has empty content"));
        }
        let span = Span::new(start, self.cursor - 1);
        Ok(self.arena.push(MarkupNode::Entity(EntityNode {
            span,
            entity_type,
            role,
            children,
        })))
    }

    /// `'[' gcontent '|' type ']'`, gcontent = literals, entities, and nested
    /// groups. The group itself contributes no raw-text characters.
    fn parse_group(&mut self, depth: usize) -> Result<NodeId, MarkupError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.syntax("annotation nesting exceeds depth ceiling"));
        }
        self.expect(MarkupToken::OpenGroup, "'['")?;
        let mut members = Vec::new();

        loop {
            match self.peek() {
                Some(MarkupToken::Text) => self.take_literal(),
                Some(MarkupToken::OpenEntity) => members.push(self.parse_entity(depth + 1)?),
                Some(MarkupToken::OpenGroup) => members.push(self.parse_group(depth + 1)?),
                Some(MarkupToken::Pipe) => break,
                Some(MarkupToken::CloseEntity) | Some(MarkupToken::CloseGroup) => {
                    return Err(self.syntax("missing '|type' before closing bracket"));
                }
                None => return Err(self.syntax("unbalanced '['")),
            }
        }
        self.advance(); // the pipe

        let entity_type = self.expect_label("group type")?;
        self.expect(MarkupToken::CloseGroup, "']'")?;

        if members.is_empty() {
            return Err(MarkupError::HeadResolution {
                group_type: entity_type,
                matches: 0,
            });
        }
        Ok(self.arena.push(MarkupNode::Group(GroupNode {
            entity_type,
            members,
        })))
    }
}

/// Build a top-level (or group-member) entity, with curly-nested children
/// folded into its value as relative-span nested entities.
fn build_query_entity(arena: &Arena, id: NodeId, query: &Arc<Query>) -> QueryEntity {
    let node = arena.entity(id);
    let entity = build_entity(arena, node, query);
    QueryEntity::from_entity(query.clone(), node.span, entity)
}

fn build_entity(arena: &Arena, node: &EntityNode, query: &Arc<Query>) -> Entity {
    let mut entity = Entity::new(query.span_text(&node.span), &node.entity_type);
    if let Some(role) = &node.role {
        entity = entity.with_role(role);
    }
    if !node.children.is_empty() {
        let children = node
            .children
            .iter()
            .map(|&child| build_nested_entity(arena, child, query, node.span.start))
            .collect();
        entity = entity.with_value(EntityValue::Children(children));
    }
    entity
}

/// Nested entities store spans relative to the enclosing entity's text;
/// `parent_start` is the enclosing entity's absolute start.
fn build_nested_entity(
    arena: &Arena,
    id: NodeId,
    query: &Arc<Query>,
    parent_start: usize,
) -> NestedEntity {
    let node = arena.entity(id);
    let relative = Span::new(node.span.start - parent_start, node.span.end - parent_start);
    let entity = build_entity(arena, node, query);
    NestedEntity::new(entity, relative, parent_start)
}

/// Build a group: members in order (entity members also join the flat
/// entities list), then resolve the head by the group's declared type.
fn build_group(
    arena: &Arena,
    id: NodeId,
    query: &Arc<Query>,
    entities: &mut Vec<QueryEntity>,
) -> Result<EntityGroup, MarkupError> {
    let node = arena.group(id);
    let mut members = Vec::with_capacity(node.members.len());

    for &member_id in &node.members {
        match arena.get(member_id) {
            MarkupNode::Entity(_) => {
                let entity = build_query_entity(arena, member_id, query);
                entities.push(entity.clone());
                members.push(GroupMember::Entity(entity));
            }
            MarkupNode::Group(_) => {
                members.push(GroupMember::Group(build_group(
                    arena, member_id, query, entities,
                )?));
            }
        }
    }

    // Head resolution: exactly one direct entity member carries the group's
    // declared type. Nested groups are always dependents.
    let candidates: Vec<usize> = members
        .iter()
        .enumerate()
        .filter_map(|(index, member)| match member {
            GroupMember::Entity(entity) if entity.entity_type() == node.entity_type => Some(index),
            _ => None,
        })
        .collect();

    if candidates.len() != 1 {
        return Err(MarkupError::HeadResolution {
            group_type: node.entity_type.clone(),
            matches: candidates.len(),
        });
    }

    let head = match members.remove(candidates[0]) {
        GroupMember::Entity(entity) => entity,
        GroupMember::Group(_) => unreachable!("head candidate is an entity"),
    };
    Ok(EntityGroup::new(head, members))
}
