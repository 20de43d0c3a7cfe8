pub mod aggregate;
pub mod distinct;
pub mod sort;

pub use aggregate::Aggregator;
pub use distinct::distinct_count;
pub use sort::{SortOrder, order_by, top1, top_n};
