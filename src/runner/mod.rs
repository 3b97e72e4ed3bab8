//! One scan from start to decision.
//!
//! A [`ScanRunner`] is created per trigger, walks its target with the
//! configured exclusion filter, runs every enabled validator on each visited
//! directory, and ends in a [`ScanOutcome`]. [`ScanRunnerRegistry`] is the
//! host-facing entry point that creates runners.

mod registry;

pub use registry::ScanRunnerRegistry;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::host::ShareHost;
use crate::result::ScanResult;
use crate::scanner::{
    CancellationToken, DirectoryVisitor, DirectoryWalker, Entry, ExclusionFilter, NoExclusion,
    ProbeExclusion, ScanTarget, WalkError, WalkStatus,
};
use crate::validator::{ContentValidator, ValidatorDefinition, ValidatorRegistry};

/// Rejection message for a hook scan stopped before it found any error.
pub const CANCELLED_MESSAGE: &str = "Validation cancelled before completion";

/// Configuration snapshot taken when a scan starts.
///
/// Later configuration changes never reach a scan that already holds one.
#[derive(Debug, Clone)]
pub struct ScanConfiguration {
    pub ignore_excluded: bool,
    pub validators: Vec<Arc<ValidatorDefinition>>,
    pub scan_finished_bundles: bool,
    pub scan_new_share_directories: bool,
    pub post_event_log: bool,
}

impl ScanConfiguration {
    /// Snapshot with both hooks active and excluded content validated.
    #[must_use]
    pub const fn new(validators: Vec<Arc<ValidatorDefinition>>) -> Self {
        Self {
            ignore_excluded: false,
            validators,
            scan_finished_bundles: true,
            scan_new_share_directories: true,
            post_event_log: true,
        }
    }

    #[must_use]
    pub const fn with_ignore_excluded(mut self, ignore_excluded: bool) -> Self {
        self.ignore_excluded = ignore_excluded;
        self
    }

    #[must_use]
    pub fn from_config(config: &Config, registry: &ValidatorRegistry) -> Self {
        Self {
            ignore_excluded: config.ignore_excluded,
            validators: registry.enabled(config),
            scan_finished_bundles: config.scan_finished_bundles,
            scan_new_share_directories: config.scan_new_share_directories,
            post_event_log: config.post_event_log,
        }
    }
}

/// Supplies a fresh configuration snapshot before every scan.
pub trait ConfigSource: Send + Sync {
    fn snapshot(&self) -> ScanConfiguration;
}

impl<F> ConfigSource for F
where
    F: Fn() -> ScanConfiguration + Send + Sync,
{
    fn snapshot(&self) -> ScanConfiguration {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Scanning,
    Completed,
    Cancelled,
    Failed,
}

/// Accept/reject verdict for hook-triggered scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected(String),
}

impl Decision {
    /// Invoke exactly one of the host callbacks.
    pub fn respond<A: FnOnce(), R: FnOnce(String)>(self, accept: A, reject: R) {
        match self {
            Self::Accepted => accept(),
            Self::Rejected(message) => reject(message),
        }
    }
}

/// Final state and collected errors of one runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub state: RunnerState,
    pub result: ScanResult,
}

impl ScanOutcome {
    /// Outcome for a trigger that needed no scan.
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            state: RunnerState::Completed,
            result: ScanResult::default(),
        }
    }

    /// The accept/reject verdict.
    ///
    /// Hook callers answer the host exactly once, cancelled or not. A
    /// cancelled scan never accepts: content it did not finish validating is
    /// rejected with [`CANCELLED_MESSAGE`], or with the errors collected
    /// before it stopped.
    #[must_use]
    pub fn decision(&self) -> Decision {
        if self.state == RunnerState::Cancelled && self.result.is_clean() {
            Decision::Rejected(CANCELLED_MESSAGE.to_string())
        } else if self.result.is_clean() {
            Decision::Accepted
        } else {
            Decision::Rejected(self.result.format())
        }
    }
}

/// Runs a single scan. Consumed by [`ScanRunner::run`], so never reused.
#[derive(Debug)]
pub struct ScanRunner<'a> {
    config: &'a ScanConfiguration,
    cancel: CancellationToken,
    state: RunnerState,
    result: ScanResult,
}

impl<'a> ScanRunner<'a> {
    #[must_use]
    pub fn new(config: &'a ScanConfiguration, cancel: CancellationToken) -> Self {
        Self {
            config,
            cancel,
            state: RunnerState::Idle,
            result: ScanResult::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunnerState {
        self.state
    }

    /// Walk `target` and validate every visited directory.
    ///
    /// `skip_queue_check` is forwarded to the host's exclusion probe when
    /// excluded content is ignored.
    pub fn run<H: ShareHost + ?Sized>(
        mut self,
        host: &H,
        target: &ScanTarget,
        skip_queue_check: bool,
    ) -> ScanOutcome {
        self.state = RunnerState::Scanning;

        let probe;
        let filter: &dyn ExclusionFilter = if self.config.ignore_excluded {
            probe = ProbeExclusion::new(host, skip_queue_check);
            &probe
        } else {
            &NoExclusion
        };

        let walker = DirectoryWalker::new(filter, &self.cancel);
        let mut visitor = ValidatingVisitor {
            validators: &self.config.validators,
            cancel: &self.cancel,
            result: &mut self.result,
        };

        self.state = match walker.walk(target, &mut visitor) {
            Ok(WalkStatus::Completed) => RunnerState::Completed,
            Ok(WalkStatus::Cancelled) => RunnerState::Cancelled,
            Err(e) => {
                warn!(path = %target.path.display(), error = %e, "scan target unreadable");
                self.result.errors = vec![e.to_validation_error()];
                RunnerState::Failed
            }
        };

        info!(
            path = %target.path.display(),
            recursive = target.recursive,
            scanned = self.result.scanned,
            errors = self.result.count(),
            state = ?self.state,
            "scan finished"
        );

        ScanOutcome {
            state: self.state,
            result: self.result,
        }
    }
}

/// Feeds visited directories through the enabled validators.
struct ValidatingVisitor<'v> {
    validators: &'v [Arc<ValidatorDefinition>],
    cancel: &'v CancellationToken,
    result: &'v mut ScanResult,
}

impl DirectoryVisitor for ValidatingVisitor<'_> {
    fn visit(&mut self, dir: &Path, entries: &[Entry]) {
        self.result.record_directory();
        for validator in self.validators {
            if self.cancel.is_cancelled() {
                return;
            }
            self.result.extend(validator.check(dir, entries));
        }
    }

    fn access_failed(&mut self, error: &WalkError) {
        self.result.push(error.to_validation_error());
    }
}

#[cfg(test)]
mod test_support;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
