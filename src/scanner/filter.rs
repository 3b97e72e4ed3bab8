use std::path::{Path, MAIN_SEPARATOR};

use tracing::trace;

use super::EntryKind;
use crate::host::ShareHost;

/// Decides whether a directory entry is left out of validation.
pub trait ExclusionFilter {
    fn is_excluded(&self, path: &Path, kind: EntryKind) -> bool;
}

/// Filter used when excluded content should be validated like anything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExclusion;

impl ExclusionFilter for NoExclusion {
    fn is_excluded(&self, _path: &Path, _kind: EntryKind) -> bool {
        false
    }
}

/// Filter backed by the host's "would this path be excluded from share" check.
///
/// Any probe failure counts as excluded.
pub struct ProbeExclusion<'a, H: ShareHost + ?Sized> {
    host: &'a H,
    skip_queue_check: bool,
}

impl<'a, H: ShareHost + ?Sized> ProbeExclusion<'a, H> {
    #[must_use]
    pub const fn new(host: &'a H, skip_queue_check: bool) -> Self {
        Self {
            host,
            skip_queue_check,
        }
    }

    /// Path string in the form the host expects: directories end with a separator.
    fn probe_path(path: &Path, kind: EntryKind) -> String {
        let mut probe = path.display().to_string();
        if kind == EntryKind::Directory && !probe.ends_with(MAIN_SEPARATOR) {
            probe.push(MAIN_SEPARATOR);
        }
        probe
    }
}

impl<H: ShareHost + ?Sized> ExclusionFilter for ProbeExclusion<'_, H> {
    fn is_excluded(&self, path: &Path, kind: EntryKind) -> bool {
        let probe = Self::probe_path(path, kind);
        match self.host.probe_exclusion(&probe, self.skip_queue_check) {
            Ok(excluded) => excluded,
            Err(e) => {
                trace!(path = %probe, reason = %e, "path excluded from share");
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
