mod cancel;
mod directory;
mod filter;

pub use cancel::CancellationToken;
pub use directory::{DirectoryVisitor, DirectoryWalker, WalkError, WalkStatus};
pub use filter::{ExclusionFilter, NoExclusion, ProbeExclusion};

use std::path::{Path, PathBuf};

/// Whether a directory entry is a subdirectory or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One child of a visited directory, as handed to validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    #[must_use]
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name, kind }
    }

    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    /// Lowercased extension without the dot, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// Directory to scan and whether to descend below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub path: PathBuf,
    pub recursive: bool,
}

impl ScanTarget {
    #[must_use]
    pub fn recursive(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: true,
        }
    }

    #[must_use]
    pub fn shallow(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
