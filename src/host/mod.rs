//! Boundary to the hub-client application that owns the share.
//!
//! The scanning engine only talks to the host through [`ShareHost`]; the
//! host decides where share roots live, which paths it would exclude, and
//! where reported events end up.

mod local;

pub use local::LocalHost;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event severity as understood by the host's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Notify,
    Info,
    Warning,
    Error,
}

/// A configured top-level share directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRoot {
    pub id: String,
    pub path: PathBuf,
}

/// A named virtual share folder and the physical directories behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedPath {
    pub name: String,
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleKind {
    File,
    #[default]
    Directory,
}

/// A finished download bundle handed to the bundle hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub name: String,
    pub target: PathBuf,
    #[serde(default)]
    pub kind: BundleKind,
}

/// Payload of the "new share directory" validation hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareDirectoryHookData {
    pub path: PathBuf,
    /// True when the directory's parent is itself new to the share.
    #[serde(default)]
    pub new_parent: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Host unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Operations the scanning engine consumes from the host.
pub trait ShareHost: Send + Sync {
    /// Resolve the given share roots, or all of them when `ids` is `None`.
    ///
    /// # Errors
    /// Returns an error if the host cannot resolve a root.
    fn share_roots(&self, ids: Option<&[String]>) -> Result<Vec<ShareRoot>, HostError>;

    /// All virtual share folders with their physical paths.
    ///
    /// # Errors
    /// Returns an error if the host cannot be queried.
    fn grouped_share_paths(&self) -> Result<Vec<GroupedPath>, HostError>;

    /// Whether the host would exclude `path` from the share.
    ///
    /// Directory paths carry a trailing separator. Callers treat an `Err` as
    /// "excluded".
    ///
    /// # Errors
    /// Returns an error to signal exclusion or an unreachable host.
    fn probe_exclusion(&self, path: &str, skip_queue_check: bool) -> Result<bool, HostError>;

    /// Post a message to the host's event log.
    ///
    /// # Errors
    /// Returns an error if the event could not be delivered.
    fn post_event(&self, text: &str, severity: Severity) -> Result<(), HostError>;
}
