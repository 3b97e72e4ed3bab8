use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::host::{GroupedPath, ShareRoot};

/// Supported config version.
pub const CONFIG_VERSION: &str = "1";

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Config schema version. Absent means current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Validate bundles when their download finishes.
    #[serde(default = "default_true")]
    pub scan_finished_bundles: bool,

    /// Validate directories as they are added to the share.
    #[serde(default = "default_true")]
    pub scan_new_share_directories: bool,

    /// Skip entries the host would exclude from the share anyway.
    #[serde(default)]
    pub ignore_excluded: bool,

    /// Also post new-directory rejections to the event log.
    /// Older hosts do not report hook rejections on their own.
    #[serde(default = "default_true")]
    pub post_event_log: bool,

    /// Per-validator settings keyed by validator key [validators.X].
    #[serde(default)]
    pub validators: HashMap<String, ValidatorSettings>,

    /// Share layout used by the local host [share].
    #[serde(default)]
    pub share: ShareConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: None,
            scan_finished_bundles: true,
            scan_new_share_directories: true,
            ignore_excluded: false,
            post_event_log: true,
            validators: HashMap::new(),
            share: ShareConfig::default(),
        }
    }
}

impl Config {
    /// Whether the validator with `key` is enabled, falling back to its default.
    #[must_use]
    pub fn validator_enabled(&self, key: &str, default_enabled: bool) -> bool {
        self.validators
            .get(key)
            .and_then(|s| s.enabled)
            .unwrap_or(default_enabled)
    }
}

/// Settings for one validator [validators.X].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatorSettings {
    /// Enable or disable the validator. Absent uses the validator default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Replace the validator's built-in patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
}

/// Share layout [share].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareConfig {
    /// Glob patterns the local host reports as excluded from share.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Share roots [[share.roots]].
    #[serde(default)]
    pub roots: Vec<ShareRoot>,

    /// Virtual folders [[share.groups]].
    #[serde(default)]
    pub groups: Vec<GroupedPath>,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
