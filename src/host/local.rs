use std::path::{MAIN_SEPARATOR, Path};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{error, info, warn};

use super::{GroupedPath, HostError, Severity, ShareHost, ShareRoot};
use crate::config::ShareConfig;
use crate::error::{ReleaseValidatorError, Result};

/// Host backed by the `[share]` table of the local configuration.
///
/// Used by the command-line front end in place of a running hub client.
/// Events go to the `tracing` subscriber.
#[derive(Debug)]
pub struct LocalHost {
    roots: Vec<ShareRoot>,
    groups: Vec<GroupedPath>,
    exclude: GlobSet,
}

impl LocalHost {
    /// Build a host from share configuration.
    ///
    /// # Errors
    /// Returns an error if any exclude pattern is invalid.
    pub fn new(config: &ShareConfig) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.exclude {
            let glob = Glob::new(pattern).map_err(|e| ReleaseValidatorError::InvalidPattern {
                pattern: pattern.clone(),
                source: e,
            })?;
            builder.add(glob);
        }
        let exclude = builder
            .build()
            .map_err(|e| ReleaseValidatorError::InvalidPattern {
                pattern: "share.exclude".to_string(),
                source: e,
            })?;

        Ok(Self {
            roots: config.roots.clone(),
            groups: config.groups.clone(),
            exclude,
        })
    }
}

impl ShareHost for LocalHost {
    fn share_roots(&self, ids: Option<&[String]>) -> std::result::Result<Vec<ShareRoot>, HostError> {
        let Some(ids) = ids else {
            return Ok(self.roots.clone());
        };

        ids.iter()
            .map(|id| {
                self.roots
                    .iter()
                    .find(|root| root.id == *id)
                    .cloned()
                    .ok_or_else(|| HostError::NotFound(format!("share root {id}")))
            })
            .collect()
    }

    fn grouped_share_paths(&self) -> std::result::Result<Vec<GroupedPath>, HostError> {
        if !self.groups.is_empty() {
            return Ok(self.groups.clone());
        }

        // Without explicit groups every root is its own virtual folder.
        Ok(self
            .roots
            .iter()
            .map(|root| GroupedPath {
                name: root.id.clone(),
                paths: vec![root.path.clone()],
            })
            .collect())
    }

    fn probe_exclusion(
        &self,
        path: &str,
        _skip_queue_check: bool,
    ) -> std::result::Result<bool, HostError> {
        let path = Path::new(path.trim_end_matches(MAIN_SEPARATOR));
        let file_name = path.file_name().unwrap_or_default();
        Ok(self.exclude.is_match(file_name) || self.exclude.is_match(path))
    }

    fn post_event(&self, text: &str, severity: Severity) -> std::result::Result<(), HostError> {
        match severity {
            Severity::Notify | Severity::Info => info!(target: "release_validator::event", "{text}"),
            Severity::Warning => warn!(target: "release_validator::event", "{text}"),
            Severity::Error => error!(target: "release_validator::event", "{text}"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
