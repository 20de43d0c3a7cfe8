//! # Use Cases
//!
//! Application-level orchestration logic.
//!
//! This crate loads a dataset through a port and runs the aggregation engine
//! over it:
//!
//! - [`report`]: the retail report (unique customers, per-category averages,
//!   location and season totals, most popular attributes)
//! - [`query`]: single ad-hoc queries (distinct, group-by, top-N)
//! - [`dto`]: data transfer objects for use case boundaries
//!
//! Use cases depend on both domain and ports, but not on infrastructure.

#![allow(clippy::multiple_crate_versions)]

pub mod dto;
pub mod query;
pub mod report;

pub use dto::{QueryOutput, ReportMeta, ReportOutput};
pub use query::{QuerySpec, RunQuery};
pub use report::{ReportOptions, ShoppingReport, columns};

use shopstats_domain::{LoadOptions, Relation};
use shopstats_ports::DatasetSource;
use shopstats_shared_kernel::{ErrorContext, Result};

/// Reads and parses the dataset behind `source`.
pub(crate) fn load_relation(source: &dyn DatasetSource, options: &LoadOptions) -> Result<Relation> {
    let name = source.describe();
    let text = source.read_text()?;
    let relation = shopstats_domain::load(&text, options).with_context(|| format!("loading {name}"))?;
    log::info!("{name}: {} rows, {} columns", relation.len(), relation.schema().len());
    Ok(relation)
}
