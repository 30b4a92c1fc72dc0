// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped scratch directories for handing files to external tools.

use std::path::{Path, PathBuf};

use pagearmor_core::error::Result;
use tempfile::TempDir;
use tracing::{debug, warn};

/// A temporary directory removed, with everything in it, when dropped.
///
/// Removal runs on every exit path. A failed removal is logged and never
/// turned into an error.
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh directory under the system temp dir.
    pub fn new(prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "Scratch directory created");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `name` inside the directory. The file need not exist.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Write `bytes` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.file(name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => debug!(path = %self.path.display(), "Scratch directory removed"),
                Err(err) => warn!(
                    path = %self.path.display(),
                    %err,
                    "Failed to remove scratch directory"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_is_removed_on_drop() {
        let path = {
            let scratch = ScratchDir::new("pagearmor-test-").unwrap();
            let file = scratch.write("input.pdf", b"%PDF-1.4").unwrap();
            assert!(file.exists());
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn directory_is_removed_when_unwinding_from_an_error() {
        fn failing(seen: &mut Option<PathBuf>) -> Result<()> {
            let scratch = ScratchDir::new("pagearmor-test-")?;
            *seen = Some(scratch.path().to_path_buf());
            scratch.write("out.pdf", b"partial")?;
            Err(pagearmor_core::ArmorError::FlattenFailure("tool exited 1".into()))
        }

        let mut seen = None;
        assert!(failing(&mut seen).is_err());
        assert!(!seen.unwrap().exists());
    }

    #[test]
    fn file_paths_stay_inside_the_directory() {
        let scratch = ScratchDir::new("pagearmor-test-").unwrap();
        assert_eq!(scratch.file("a.png").parent(), Some(scratch.path()));
    }
}
