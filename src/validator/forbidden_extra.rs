use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::ContentValidator;
use crate::error::{ReleaseValidatorError, Result};
use crate::result::ValidationError;
use crate::scanner::Entry;

const DEFAULT_PATTERNS: &[&str] = &[
    "*.zip",
    "*.url",
    "*.lnk",
    "*.tmp",
    "thumbs.db",
    "desktop.ini",
    ".DS_Store",
];

/// Flags files that should not ship alongside release content.
///
/// Patterns are case-insensitive globs matched against file names.
#[derive(Debug, Clone)]
pub struct ForbiddenExtraValidator {
    patterns: Vec<String>,
    matcher: GlobSet,
}

impl ForbiddenExtraValidator {
    pub const KEY: &'static str = "forbidden_extra";

    /// # Errors
    /// Returns an error if any pattern is not a valid glob.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|e| ReleaseValidatorError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source: e,
                })?;
            builder.add(glob);
        }
        let matcher = builder
            .build()
            .map_err(|e| ReleaseValidatorError::InvalidPattern {
                pattern: "forbidden_extra patterns".to_string(),
                source: e,
            })?;

        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            matcher,
        })
    }

    /// # Errors
    /// Returns an error if a built-in pattern fails to compile.
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_PATTERNS)
    }

    fn matched_pattern(&self, name: &str) -> Option<&str> {
        self.matcher
            .matches(name)
            .first()
            .and_then(|&idx| self.patterns.get(idx))
            .map(String::as_str)
    }
}

impl ContentValidator for ForbiddenExtraValidator {
    fn check(&self, _dir: &Path, entries: &[Entry]) -> Vec<ValidationError> {
        entries
            .iter()
            .filter(|entry| entry.is_file())
            .filter_map(|entry| {
                self.matched_pattern(&entry.name).map(|pattern| {
                    ValidationError::new(
                        &entry.path,
                        Self::KEY,
                        format!("Forbidden extra file (matches '{pattern}')"),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "forbidden_extra_tests.rs"]
mod tests;
