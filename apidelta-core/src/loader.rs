//! Source text loading.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{AnalyzeError, Result};

/// Supplies source text for a path.
pub trait SourceLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<String>;
}

/// Reads UTF-8 files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|source| AnalyzeError::Read {
            path: path.display().to_string(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|e| AnalyzeError::Read {
            path: path.display().to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, e.utf8_error()),
        })
    }
}

/// Serves text from memory, for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AnalyzeError::Read {
                path: path.display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_loader_reads_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.py");
        fs::write(&path, "x = 1\n").unwrap();
        assert_eq!(FsLoader.load(&path).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_fs_loader_missing_file() {
        let err = FsLoader.load(Path::new("/nonexistent/a.py")).unwrap_err();
        assert!(matches!(err, AnalyzeError::Read { .. }));
    }

    #[test]
    fn test_fs_loader_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.py");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = FsLoader.load(&path).unwrap_err();
        assert!(err.to_string().contains("bin.py"));
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with_file("m.py", "def f():\n    pass\n");
        assert!(loader.load(Path::new("m.py")).is_ok());
        assert!(loader.load(Path::new("other.py")).is_err());
    }
}
