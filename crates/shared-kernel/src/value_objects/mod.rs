// crates/shared-kernel/src/value_objects/mod.rs
pub mod column;
pub mod counts;

pub use column::ColumnName;
pub use counts::RowCount;
