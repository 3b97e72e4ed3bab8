use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{ConfigSource, Decision, RunnerState, ScanConfiguration, ScanOutcome, ScanRunner};
use crate::host::{Bundle, BundleKind, HostError, Severity, ShareDirectoryHookData, ShareHost};
use crate::result::{ScanResult, ValidationError};
use crate::scanner::{CancellationToken, ScanTarget};

/// Validator key for errors raised while resolving share paths.
pub const SHARE_LOOKUP_KEY: &str = "share_lookup";

/// Host-facing entry point: hook handlers, on-demand scans and shutdown.
///
/// Hook scans run independently of each other. At most one whole-share scan
/// (`scan_share` or `scan_share_roots`) runs at a time; overlapping requests
/// are refused.
pub struct ScanRunnerRegistry<H: ShareHost, C: ConfigSource> {
    host: H,
    config: C,
    cancel: Mutex<CancellationToken>,
    share_scan_active: AtomicBool,
}

/// Releases the whole-share scan slot when dropped.
struct ShareScanGuard<'a>(&'a AtomicBool);

impl Drop for ShareScanGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<H: ShareHost, C: ConfigSource> ScanRunnerRegistry<H, C> {
    #[must_use]
    pub fn new(host: H, config: C) -> Self {
        Self {
            host,
            config,
            cancel: Mutex::new(CancellationToken::new()),
            share_scan_active: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Whether a whole-share scan currently holds the single-flight slot.
    #[must_use]
    pub fn is_share_scan_active(&self) -> bool {
        self.share_scan_active.load(Ordering::SeqCst)
    }

    /// Cancel every scan that is currently running.
    ///
    /// Scans started afterwards get a fresh token and run normally.
    pub fn stop(&self) {
        let mut token = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        token.cancel();
        *token = CancellationToken::new();
        info!("running scans cancelled");
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn post(&self, text: &str, severity: Severity) {
        if let Err(e) = self.host.post_event(text, severity) {
            debug!(error = %e, "failed to post event");
        }
    }

    fn run_one(
        &self,
        config: &ScanConfiguration,
        cancel: &CancellationToken,
        target: &ScanTarget,
        skip_queue_check: bool,
    ) -> ScanOutcome {
        ScanRunner::new(config, cancel.clone()).run(&self.host, target, skip_queue_check)
    }

    /// Bundle-finished hook: validates the bundle's directory recursively.
    ///
    /// Calls exactly one of `accept`/`reject`.
    pub fn on_bundle_finished<A, R>(&self, bundle: &Bundle, accept: A, reject: R) -> ScanOutcome
    where
        A: FnOnce(),
        R: FnOnce(String),
    {
        let cancel = self.current_token();
        let config = self.config.snapshot();
        if !config.scan_finished_bundles || bundle.kind == BundleKind::File {
            debug!(bundle = %bundle.name, kind = ?bundle.kind, "bundle accepted without scan");
            accept();
            return ScanOutcome::skipped();
        }

        // The finished bundle is still in the queue, so the probe must not
        // reject it for that reason.
        let outcome = self.run_one(
            &config,
            &cancel,
            &ScanTarget::recursive(&bundle.target),
            true,
        );
        outcome.decision().respond(accept, reject);
        outcome
    }

    /// New-share-directory hook: validates only the added directory itself.
    ///
    /// Calls exactly one of `accept`/`reject`.
    pub fn on_share_directory_added<A, R>(
        &self,
        data: &ShareDirectoryHookData,
        accept: A,
        reject: R,
    ) -> ScanOutcome
    where
        A: FnOnce(),
        R: FnOnce(String),
    {
        let cancel = self.current_token();
        let config = self.config.snapshot();
        if !config.scan_new_share_directories {
            accept();
            return ScanOutcome::skipped();
        }

        let outcome = self.run_one(&config, &cancel, &ScanTarget::shallow(&data.path), false);
        match outcome.decision() {
            Decision::Rejected(message) => {
                if config.post_event_log {
                    self.post(
                        &format!(
                            "Share directory {} was rejected:\n{message}",
                            data.path.display()
                        ),
                        Severity::Error,
                    );
                }
                reject(message);
            }
            Decision::Accepted => accept(),
        }
        outcome
    }

    /// Scan the given share roots, or every root when `ids` is `None`.
    ///
    /// Returns `None` when another whole-share scan is already running.
    pub fn scan_share_roots(&self, ids: Option<&[String]>) -> Option<ScanResult> {
        let _guard = self.try_begin_share_scan()?;
        let cancel = self.current_token();
        let config = self.config.snapshot();

        let (result, cancelled) = match self.host.share_roots(ids) {
            Ok(roots) => {
                self.post(
                    &format!("Scanning {} share root(s) for invalid content", roots.len()),
                    Severity::Info,
                );
                let paths: IndexSet<PathBuf> = roots.into_iter().map(|r| r.path).collect();
                self.scan_paths(&config, &cancel, &paths)
            }
            Err(e) => {
                let what = ids.map_or_else(|| "share roots".to_string(), |ids| ids.join(", "));
                (Self::lookup_failure(&what, &e), false)
            }
        };

        self.post_summary(&result, cancelled);
        Some(result)
    }

    /// Scan every physical path of every virtual share folder.
    ///
    /// Returns `None` when another whole-share scan is already running.
    pub fn scan_share(&self) -> Option<ScanResult> {
        let _guard = self.try_begin_share_scan()?;
        let cancel = self.current_token();
        let config = self.config.snapshot();

        let (result, cancelled) = match self.host.grouped_share_paths() {
            Ok(groups) => {
                let paths: IndexSet<PathBuf> =
                    groups.into_iter().flat_map(|group| group.paths).collect();
                self.post(
                    &format!("Scanning {} share path(s) for invalid content", paths.len()),
                    Severity::Info,
                );
                self.scan_paths(&config, &cancel, &paths)
            }
            Err(e) => (Self::lookup_failure("share", &e), false),
        };

        self.post_summary(&result, cancelled);
        Some(result)
    }

    fn try_begin_share_scan(&self) -> Option<ShareScanGuard<'_>> {
        if self
            .share_scan_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("share scan requested while another one is running");
            self.post("A share scan is already running", Severity::Warning);
            return None;
        }
        Some(ShareScanGuard(&self.share_scan_active))
    }

    /// Run one recursive runner per path and merge results in path order.
    /// The flag reports whether any runner was cancelled.
    ///
    /// Every runner shares `cancel`, so a `stop()` issued after the scan
    /// started also prevents paths that have not begun yet.
    fn scan_paths(
        &self,
        config: &ScanConfiguration,
        cancel: &CancellationToken,
        paths: &IndexSet<PathBuf>,
    ) -> (ScanResult, bool) {
        let paths: Vec<&PathBuf> = paths.iter().collect();
        let outcomes: Vec<ScanOutcome> = paths
            .par_iter()
            .map(|path| self.run_one(config, cancel, &ScanTarget::recursive(*path), false))
            .collect();

        let cancelled = outcomes
            .iter()
            .any(|o| o.state == RunnerState::Cancelled);
        if cancelled {
            info!("share scan cancelled before completion");
        }

        let result = outcomes
            .into_iter()
            .fold(ScanResult::default(), |mut acc, outcome| {
                acc.merge(outcome.result);
                acc
            });
        (result, cancelled)
    }

    fn lookup_failure(what: &str, error: &HostError) -> ScanResult {
        warn!(target = what, error = %error, "failed to resolve share paths");
        let mut result = ScanResult::default();
        result.push(ValidationError::new(
            what,
            SHARE_LOOKUP_KEY,
            format!("Failed to resolve share paths: {error}"),
        ));
        result
    }

    fn post_summary(&self, result: &ScanResult, cancelled: bool) {
        let status = if cancelled { "cancelled" } else { "completed" };
        let summary = format!(
            "Scan {status}: {} directories scanned, {} errors found",
            result.scanned,
            result.count()
        );
        if result.is_clean() {
            self.post(&summary, Severity::Info);
        } else {
            self.post(&format!("{summary}\n\n{}", result.format()), Severity::Warning);
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
