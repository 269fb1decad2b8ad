//! Core data model for processed queries
//!
//!     This module defines the span-addressed object graph the markup engine
//!     produces and consumes: character spans, typed entities (with absolute
//!     or parent-relative placement), head/dependent entity groups, and the
//!     `ProcessedQuery` aggregate that ties them to a query.
//!
//!     All values here are immutable after construction and safe to share
//!     across threads. Anything that looks like an edit produces a new value.
//!
//! Coordinate systems
//!
//!     Offsets are *character* offsets, never bytes, and spans are inclusive
//!     on both ends. A [`QueryEntity`] is placed by an absolute span into the
//!     query's raw text; a [`NestedEntity`] is placed relative to the text of
//!     the entity that encloses it and carries the `parent_offset` needed to
//!     translate back into absolute coordinates. The two systems never mix
//!     untagged: translation goes through [`Span::to_absolute`] only.

pub mod entity;
pub mod group;
pub mod processed;
pub mod snapshot;
pub mod span;

pub use entity::{Entity, EntityValue, NestedEntity, QueryEntity};
pub use group::{EntityGroup, GroupMember};
pub use processed::ProcessedQuery;
pub use span::Span;
