//! Temporary dotenv files.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temp directory holding a single dotenv file; removed on drop.
pub struct DotenvDir {
    dir: TempDir,
    path: PathBuf,
}

impl DotenvDir {
    /// Create a temp directory containing `.env` with the given contents.
    pub fn new(contents: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let path = write_dotenv(dir.path(), contents);
        Self { dir, path }
    }

    /// Path of the dotenv file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file in the same directory that does not exist.
    pub fn missing_path(&self) -> PathBuf {
        self.dir.path().join("missing.env")
    }
}

/// Write `.env` contents into a directory, returning the file path.
pub fn write_dotenv(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join(".env");
    fs::write(&path, contents).expect("write dotenv");
    path
}
