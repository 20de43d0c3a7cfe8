// crates/infra/src/source.rs
use std::path::{Path, PathBuf};

use shopstats_ports::DatasetSource;
use shopstats_shared_kernel::{InfrastructureError, Result};

use crate::persistence::FileReader;

/// Dataset read from a UTF-8 file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn read_text(&self) -> Result<String> {
        let bytes = FileReader::read_without_bom(&self.path)
            .map_err(|source| InfrastructureError::FileRead { path: self.path.clone(), source })?;
        log::debug!("read {} bytes from {}", bytes.len(), self.path.display());
        String::from_utf8(bytes).map_err(|err| {
            InfrastructureError::Decode { path: self.path.clone(), details: err.utf8_error().to_string() }.into()
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
