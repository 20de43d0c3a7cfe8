//! # Domain
//!
//! In-memory relations and the aggregation engine that runs over them.
//!
//! - [`model`]: `Relation`, `Schema`, `Row` and `Cell`
//! - [`loader`]: parses delimited text into a `Relation`
//! - [`numeric`]: explicit text-to-number coercion used by metric aggregates
//! - [`analytics`]: distinct counts, group-by aggregates and top-N ranking
//!
//! Every operation takes an immutable relation and returns a fresh value.

#![allow(clippy::multiple_crate_versions)]

pub mod analytics;
pub mod loader;
pub mod model;
pub mod numeric;
pub mod options;

pub use analytics::{Aggregator, SortOrder, distinct_count, order_by, top1, top_n};
pub use loader::{LoadOptions, load};
pub use model::{Cell, Column, ColumnKind, Relation, Row, Schema};
pub use numeric::NumericPolicy;
pub use options::AggregateOp;
