//! # Ports
//!
//! Interface definitions for external dependencies.
//!
//! - [`source`]: where the raw text of a dataset comes from
//!
//! The aggregation engine never touches the filesystem; use cases receive a
//! [`source::DatasetSource`] and hand its text to the loader.

// crates/ports/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod source;

pub use source::{DatasetSource, TextSource};
