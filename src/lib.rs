//! # qmarkup
//!
//! A parser and serializer for annotated query markup.
//!
//! Natural-language training data is authored as plain text with bracket
//! annotations: `{...|type}` marks an entity (curly annotations nest),
//! `[...|type]` marks an entity group. This crate converts that markup into a
//! span-addressed object graph and back:
//!
//! - [`markup::load_query`] parses markup into a [`core::ProcessedQuery`]
//! - [`markup::dump_query`] renders the graph back, byte-identical for
//!   anything the loader produced
//! - [`markup::mark_down`] strips all annotation syntax
//!
//! The [`query`] module holds the query handle and text normalization the
//! entities delegate to; [`core`] holds the data model.

pub mod core;
pub mod markup;
pub mod query;
