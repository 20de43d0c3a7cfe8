// crates/ports/src/source.rs
use shopstats_shared_kernel::Result;

/// Port supplying the delimited text of a dataset.
pub trait DatasetSource: Send + Sync {
    /// Reads the whole dataset as UTF-8 text.
    fn read_text(&self) -> Result<String>;

    /// Short human-readable description (a path, a URL, `"<stdin>"`).
    fn describe(&self) -> String;
}

/// In-memory source, mostly for tests and piping.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

impl DatasetSource for TextSource {
    fn read_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
