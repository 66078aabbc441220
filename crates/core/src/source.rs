//! Source provider abstraction so conversion can run without `std::fs`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reads RDL source text for a path.
///
/// [`FileSystemProvider`] delegates to `std::fs`; [`InMemoryProvider`]
/// serves a fixed set of files for tests and embedding.
pub trait SourceProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error>;
}

pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }
}

/// In-memory source provider keyed by exact path.
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        Self { files }
    }

    pub fn single(path: impl Into<PathBuf>, src: impl Into<String>) -> Self {
        let mut files = HashMap::new();
        files.insert(path.into(), src.into());
        Self { files }
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }
}
