use std::path::Path;

use regex::{Regex, RegexSet};
use tracing::trace;

use super::ContentValidator;
use crate::error::{ReleaseValidatorError, Result};
use crate::result::ValidationError;
use crate::scanner::Entry;

const DEFAULT_PATTERNS: &[&str] = &[
    r"(?i)^sample$",
    r"(?i)(^|[._-])sample([._-].*)?\.(mkv|mp4|avi|wmv|m2ts|vob)$",
];

/// Flags sample directories and sample video files.
#[derive(Debug, Clone)]
pub struct SampleValidator {
    patterns: RegexSet,
}

impl SampleValidator {
    pub const KEY: &'static str = "sample";

    /// Build from regular expressions matched against entry names.
    ///
    /// # Errors
    /// Returns an error if any pattern is not a valid regex.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        // Compile one by one so the error names the offending pattern.
        for pattern in patterns {
            Regex::new(pattern.as_ref()).map_err(|e| ReleaseValidatorError::InvalidRegex {
                pattern: pattern.as_ref().to_string(),
                source: e,
            })?;
        }
        let patterns = RegexSet::new(patterns.iter().map(|p| p.as_ref())).map_err(|e| {
            ReleaseValidatorError::InvalidRegex {
                pattern: "sample patterns".to_string(),
                source: e,
            }
        })?;
        Ok(Self { patterns })
    }

    /// # Errors
    /// Returns an error if a built-in pattern fails to compile.
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_PATTERNS)
    }
}

impl ContentValidator for SampleValidator {
    fn check(&self, dir: &Path, entries: &[Entry]) -> Vec<ValidationError> {
        entries
            .iter()
            .filter(|entry| self.patterns.is_match(&entry.name))
            .map(|entry| {
                trace!(dir = %dir.display(), name = %entry.name, "sample content");
                let message = if entry.is_dir() {
                    "Sample directory found"
                } else {
                    "Sample file found"
                };
                ValidationError::new(&entry.path, Self::KEY, message)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "sample_tests.rs"]
mod tests;
