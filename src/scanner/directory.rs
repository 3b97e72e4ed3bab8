use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{CancellationToken, Entry, EntryKind, ExclusionFilter, ScanTarget};
use crate::result::ValidationError;

/// A directory could not be listed.
#[derive(Error, Debug)]
#[error("Failed to read directory {}: {:?}: {}", .path.display(), .source.kind(), .source)]
pub struct WalkError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl WalkError {
    fn from_walkdir(dir: &Path, err: walkdir::Error) -> Self {
        let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
        let message = err.to_string();
        let source = err.into_io_error().unwrap_or_else(|| io::Error::other(message));
        Self { path, source }
    }

    /// The failure as a per-directory validation error.
    #[must_use]
    pub fn to_validation_error(&self) -> ValidationError {
        ValidationError::disk_access(&self.path, &self.source)
    }
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    Completed,
    Cancelled,
}

/// Receives every visited directory during a walk.
pub trait DirectoryVisitor {
    /// Called once per visited directory with its filtered entries.
    fn visit(&mut self, dir: &Path, entries: &[Entry]);

    /// Called when a subdirectory below the root could not be read.
    fn access_failed(&mut self, error: &WalkError);
}

/// Depth-first directory walker.
///
/// Entries are listed in file-name order so repeated walks over an unchanged
/// tree produce the same visitation order.
pub struct DirectoryWalker<'a, F: ExclusionFilter + ?Sized> {
    filter: &'a F,
    cancel: &'a CancellationToken,
}

impl<'a, F: ExclusionFilter + ?Sized> DirectoryWalker<'a, F> {
    #[must_use]
    pub const fn new(filter: &'a F, cancel: &'a CancellationToken) -> Self {
        Self { filter, cancel }
    }

    /// Walk `target`, handing each visited directory to `visitor`.
    ///
    /// # Errors
    /// Returns an error if the root of the target cannot be read. Failures
    /// below the root are reported through [`DirectoryVisitor::access_failed`].
    pub fn walk<V: DirectoryVisitor + ?Sized>(
        &self,
        target: &ScanTarget,
        visitor: &mut V,
    ) -> Result<WalkStatus, WalkError> {
        let mut pending: Vec<PathBuf> = vec![target.path.clone()];
        let mut is_root = true;

        while let Some(dir) = pending.pop() {
            if self.cancel.is_cancelled() {
                debug!(path = %dir.display(), "walk cancelled");
                return Ok(WalkStatus::Cancelled);
            }

            if is_root {
                Self::check_root(&dir)?;
            }

            let entries = match self.list(&dir) {
                Ok(entries) => entries,
                Err(e) if is_root => return Err(e),
                Err(e) => {
                    warn!(path = %e.path.display(), error = %e.source, "skipping unreadable directory");
                    visitor.access_failed(&e);
                    continue;
                }
            };
            is_root = false;

            debug!(path = %dir.display(), entries = entries.len(), "visiting directory");
            visitor.visit(&dir, &entries);

            if target.recursive {
                // Reverse so the first subdirectory is popped first.
                pending.extend(
                    entries
                        .iter()
                        .rev()
                        .filter(|e| e.is_dir())
                        .map(|e| e.path.clone()),
                );
            }
        }

        if self.cancel.is_cancelled() {
            return Ok(WalkStatus::Cancelled);
        }
        Ok(WalkStatus::Completed)
    }

    /// The scan root must be an existing directory; walkdir would list a
    /// plain file as an empty directory.
    fn check_root(dir: &Path) -> Result<(), WalkError> {
        let metadata = fs::metadata(dir).map_err(|source| WalkError {
            path: dir.to_path_buf(),
            source,
        })?;
        if metadata.is_dir() {
            return Ok(());
        }
        Err(WalkError {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "Not a directory"),
        })
    }

    /// List the immediate children of `dir`, minus excluded ones.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, WalkError> {
        let mut entries = Vec::new();
        let listing = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for item in listing {
            let item = item.map_err(|e| WalkError::from_walkdir(dir, e))?;
            let kind = if item.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            if self.filter.is_excluded(item.path(), kind) {
                debug!(path = %item.path().display(), "entry excluded");
                continue;
            }
            entries.push(Entry::new(item.into_path(), kind));
        }

        Ok(entries)
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
