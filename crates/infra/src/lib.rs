// crates/infra/src/lib.rs
#![allow(clippy::multiple_crate_versions)]

pub mod persistence;
pub mod source;

pub use persistence::{FileReader, FileWriter};
pub use source::FileSource;
