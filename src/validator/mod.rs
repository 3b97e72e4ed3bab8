//! Content validation rules applied to every visited directory.
//!
//! Each rule is a [`Validator`] variant. The full set is compiled once from
//! configuration into a [`ValidatorRegistry`]; every scan then receives the
//! enabled subset as a snapshot.

mod forbidden_extra;
mod sample;

pub use forbidden_extra::ForbiddenExtraValidator;
pub use sample::SampleValidator;

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ReleaseValidatorError, Result};
use crate::result::ValidationError;
use crate::scanner::Entry;

/// A rule checked against one directory's entries.
///
/// Implementations must be deterministic and free of side effects other than
/// logging.
pub trait ContentValidator {
    fn check(&self, dir: &Path, entries: &[Entry]) -> Vec<ValidationError>;
}

/// All built-in rule families.
#[derive(Debug, Clone)]
pub enum Validator {
    Sample(SampleValidator),
    ForbiddenExtra(ForbiddenExtraValidator),
}

impl ContentValidator for Validator {
    fn check(&self, dir: &Path, entries: &[Entry]) -> Vec<ValidationError> {
        match self {
            Self::Sample(v) => v.check(dir, entries),
            Self::ForbiddenExtra(v) => v.check(dir, entries),
        }
    }
}

/// A registered rule with the metadata used for its settings entry.
#[derive(Debug, Clone)]
pub struct ValidatorDefinition {
    pub key: &'static str,
    pub title: &'static str,
    pub default_enabled: bool,
    pub validator: Validator,
}

impl ContentValidator for ValidatorDefinition {
    fn check(&self, dir: &Path, entries: &[Entry]) -> Vec<ValidationError> {
        self.validator.check(dir, entries)
    }
}

/// Compiled set of every known validator, in a fixed order.
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    definitions: Vec<Arc<ValidatorDefinition>>,
}

impl ValidatorRegistry {
    pub const KEYS: [&'static str; 2] = [SampleValidator::KEY, ForbiddenExtraValidator::KEY];

    /// Registry with built-in patterns only.
    ///
    /// # Errors
    /// Returns an error if a built-in pattern fails to compile.
    pub fn builtin() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    /// Compile all validators, applying pattern overrides from `config`.
    ///
    /// # Errors
    /// Returns an error for unknown validator keys or invalid patterns.
    pub fn from_config(config: &Config) -> Result<Self> {
        if let Some(unknown) = config
            .validators
            .keys()
            .find(|key| !Self::KEYS.contains(&key.as_str()))
        {
            return Err(ReleaseValidatorError::Config(format!(
                "Unknown validator '{unknown}'. Known validators: {}",
                Self::KEYS.join(", ")
            )));
        }

        let patterns = |key: &str| {
            config
                .validators
                .get(key)
                .and_then(|s| s.patterns.as_deref())
        };

        let sample = match patterns(SampleValidator::KEY) {
            Some(p) => SampleValidator::new(p)?,
            None => SampleValidator::with_defaults()?,
        };
        let forbidden = match patterns(ForbiddenExtraValidator::KEY) {
            Some(p) => ForbiddenExtraValidator::new(p)?,
            None => ForbiddenExtraValidator::with_defaults()?,
        };

        Ok(Self {
            definitions: vec![
                Arc::new(ValidatorDefinition {
                    key: SampleValidator::KEY,
                    title: "Sample content",
                    default_enabled: true,
                    validator: Validator::Sample(sample),
                }),
                Arc::new(ValidatorDefinition {
                    key: ForbiddenExtraValidator::KEY,
                    title: "Forbidden extra files",
                    default_enabled: true,
                    validator: Validator::ForbiddenExtra(forbidden),
                }),
            ],
        })
    }

    #[must_use]
    pub fn definitions(&self) -> &[Arc<ValidatorDefinition>] {
        &self.definitions
    }

    /// The subset enabled by `config`, in registry order.
    #[must_use]
    pub fn enabled(&self, config: &Config) -> Vec<Arc<ValidatorDefinition>> {
        self.definitions
            .iter()
            .filter(|d| config.validator_enabled(d.key, d.default_enabled))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
