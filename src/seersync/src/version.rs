//! Per-platform version tracking
//!
//! Each platform work dir carries a `.version` file with the last mirrored
//! remote version string. Comparison is plain string inequality; the file
//! is only written after a successful mirror, so a failed run retries.

use std::io;
use std::path::{Path, PathBuf};

/// Name of the version marker file inside a work dir
pub const VERSION_FILE_NAME: &str = ".version";

/// Handle to a work dir's version marker
#[derive(Debug, Clone)]
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            path: work_dir.join(VERSION_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last mirrored version, `None` when the marker does not exist yet
    pub fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents.trim().to_string())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Record a mirrored version, creating the work dir if needed
    pub fn store(&self, version: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, version)
    }

    /// True when the local tree is missing or behind `remote`
    pub fn needs_update(&self, remote: &str) -> io::Result<bool> {
        Ok(match self.load()? {
            Some(local) => local != remote,
            None => true,
        })
    }
}
