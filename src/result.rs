use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Validator key attached to errors produced by the walker itself.
pub const DISK_ACCESS_KEY: &str = "disk_access";

/// A single failure record: which path failed, which rule flagged it, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: PathBuf,
    #[serde(rename = "validator")]
    pub validator_key: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, validator_key: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            validator_key: validator_key.to_string(),
            message: message.into(),
        }
    }

    /// Error recorded when a directory could not be read.
    #[must_use]
    pub fn disk_access(path: &Path, source: &std::io::Error) -> Self {
        Self::new(
            path,
            DISK_ACCESS_KEY,
            format!("{:?}: {source}", source.kind()),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Aggregated outcome of one or more scans.
///
/// `scanned` counts visited directories, never files. Errors keep the order in
/// which directories were visited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub scanned: usize,
    pub errors: Vec<ValidationError>,
}

impl ScanResult {
    #[must_use]
    pub const fn count(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn record_directory(&mut self) {
        self.scanned += 1;
    }

    pub(crate) fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub(crate) fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    /// Append another result after this one.
    pub fn merge(&mut self, other: Self) {
        self.scanned += other.scanned;
        self.errors.extend(other.errors);
    }

    /// Human-readable listing, one error per line.
    #[must_use]
    pub fn format(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
