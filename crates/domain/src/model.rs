pub mod cell;
pub mod relation;
pub mod schema;

pub use cell::Cell;
pub(crate) use cell::CellKey;
pub use relation::{Relation, Row};
pub use schema::{Column, ColumnKind, Schema};
