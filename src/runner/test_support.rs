//! In-memory host and fixtures shared by runner tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tempfile::TempDir;

use crate::host::{GroupedPath, HostError, Severity, ShareHost, ShareRoot};
use crate::runner::ScanConfiguration;
use crate::validator::ValidatorRegistry;

pub const RELEASE_NAME: &str = "Test.Release-TEST";

/// Host that records probe calls and events and serves fixed share paths.
pub struct MockHost {
    pub roots: Vec<ShareRoot>,
    pub groups: Vec<GroupedPath>,
    pub fail_lookups: bool,
    excluded_suffixes: Vec<String>,
    pub probes: Mutex<Vec<(String, bool)>>,
    pub excluded_hits: Mutex<Vec<String>>,
    pub events: Mutex<Vec<(String, Severity)>>,
    /// Runs after every recorded event.
    pub on_event: OnceLock<Box<dyn Fn() + Send + Sync>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            groups: Vec::new(),
            fail_lookups: false,
            excluded_suffixes: Vec::new(),
            probes: Mutex::new(Vec::new()),
            excluded_hits: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            on_event: OnceLock::new(),
        }
    }

    pub fn with_root(mut self, id: &str, path: &Path) -> Self {
        self.roots.push(ShareRoot {
            id: id.to_string(),
            path: path.to_path_buf(),
        });
        self
    }

    pub fn with_group(mut self, name: &str, paths: Vec<PathBuf>) -> Self {
        self.groups.push(GroupedPath {
            name: name.to_string(),
            paths,
        });
        self
    }

    /// Probe paths ending with `suffix` are reported excluded by failing.
    pub fn excluding(mut self, suffix: &str) -> Self {
        self.excluded_suffixes.push(suffix.to_string());
        self
    }

    pub const fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    pub fn events(&self) -> Vec<(String, Severity)> {
        self.events.lock().unwrap().clone()
    }
}

impl ShareHost for MockHost {
    fn share_roots(&self, ids: Option<&[String]>) -> Result<Vec<ShareRoot>, HostError> {
        if self.fail_lookups {
            return Err(HostError::Unavailable("socket closed".to_string()));
        }
        Ok(match ids {
            None => self.roots.clone(),
            Some(ids) => self
                .roots
                .iter()
                .filter(|r| ids.contains(&r.id))
                .cloned()
                .collect(),
        })
    }

    fn grouped_share_paths(&self) -> Result<Vec<GroupedPath>, HostError> {
        if self.fail_lookups {
            return Err(HostError::Unavailable("socket closed".to_string()));
        }
        Ok(self.groups.clone())
    }

    fn probe_exclusion(&self, path: &str, skip_queue_check: bool) -> Result<bool, HostError> {
        self.probes
            .lock()
            .unwrap()
            .push((path.to_string(), skip_queue_check));
        if self.excluded_suffixes.iter().any(|s| path.ends_with(s.as_str())) {
            self.excluded_hits.lock().unwrap().push(path.to_string());
            return Err(HostError::Rejected("Ignored".to_string()));
        }
        Ok(false)
    }

    fn post_event(&self, text: &str, severity: Severity) -> Result<(), HostError> {
        self.events
            .lock()
            .unwrap()
            .push((text.to_string(), severity));
        if let Some(hook) = self.on_event.get() {
            hook();
        }
        Ok(())
    }
}

/// `Test.Release-TEST/` with an NFO, a forbidden zip and a `Sample/` folder.
///
/// Two directories; fails both built-in rules.
pub fn release_fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let release = temp.path().join(RELEASE_NAME);
    fs::create_dir_all(release.join("Sample")).unwrap();
    fs::write(release.join("test.release-test.nfo"), "nfo").unwrap();
    fs::write(release.join("forbidden_extra.zip"), "zip").unwrap();
    fs::write(release.join("Sample").join("test-sample.mkv"), "mkv").unwrap();
    (temp, release)
}

/// A release that passes every built-in rule.
pub fn clean_fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let release = temp.path().join("Clean.Release-GRP");
    fs::create_dir_all(release.join("Subs")).unwrap();
    fs::write(release.join("clean.release-grp.nfo"), "nfo").unwrap();
    fs::write(release.join("clean.release-grp.mkv"), "mkv").unwrap();
    fs::write(release.join("Subs").join("clean.release-grp.srt"), "srt").unwrap();
    (temp, release)
}

pub fn scan_config(ignore_excluded: bool) -> ScanConfiguration {
    let registry = ValidatorRegistry::builtin().unwrap();
    ScanConfiguration::new(registry.definitions().to_vec()).with_ignore_excluded(ignore_excluded)
}
