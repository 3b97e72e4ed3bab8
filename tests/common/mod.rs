#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use release_validator::host::{GroupedPath, HostError, Severity, ShareHost, ShareRoot};
use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the release-validator binary.
#[macro_export]
macro_rules! release_validator {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("release-validator"))
    };
}

pub const RELEASE_NAME: &str = "Test.Release-TEST";

/// Creates a temporary directory with test fixtures for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file with the given content, creating parent directories.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn create_dir(&self, relative_path: &str) {
        let path = self.dir.path().join(relative_path);
        fs::create_dir_all(&path).expect("Failed to create directory");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative_path: &str) -> PathBuf {
        self.dir.path().join(relative_path)
    }

    /// Writes `release-validator.toml` into the fixture root.
    pub fn create_config(&self, content: &str) {
        self.create_file("release-validator.toml", content);
    }

    /// A release that fails both built-in validators:
    /// one `Sample` directory, one zip and one sample video.
    pub fn create_bad_release(&self, name: &str) -> PathBuf {
        self.create_file(&format!("{name}/test.release-test.nfo"), "nfo");
        self.create_file(&format!("{name}/forbidden_extra.zip"), "zip");
        self.create_file(&format!("{name}/Sample/test-sample.mkv"), "video");
        self.join(name)
    }

    /// A release with nothing objectionable in it.
    pub fn create_clean_release(&self, name: &str) -> PathBuf {
        self.create_file(&format!("{name}/clean.release-grp.nfo"), "nfo");
        self.create_file(&format!("{name}/clean.release-grp.mkv"), "video");
        self.create_file(&format!("{name}/Subs/clean.release-grp.srt"), "subs");
        self.join(name)
    }
}

/// Host stub that serves fixed share paths and records posted events.
pub struct RecordingHost {
    pub roots: Vec<ShareRoot>,
    pub groups: Vec<GroupedPath>,
    pub events: Mutex<Vec<(String, Severity)>>,
}

impl RecordingHost {
    pub fn new(roots: Vec<ShareRoot>) -> Self {
        Self {
            roots,
            groups: Vec::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<(String, Severity)> {
        self.events.lock().unwrap().clone()
    }
}

impl ShareHost for RecordingHost {
    fn share_roots(&self, ids: Option<&[String]>) -> Result<Vec<ShareRoot>, HostError> {
        match ids {
            None => Ok(self.roots.clone()),
            Some(ids) => ids
                .iter()
                .map(|id| {
                    self.roots
                        .iter()
                        .find(|r| r.id == *id)
                        .cloned()
                        .ok_or_else(|| HostError::NotFound(id.clone()))
                })
                .collect(),
        }
    }

    fn grouped_share_paths(&self) -> Result<Vec<GroupedPath>, HostError> {
        Ok(self.groups.clone())
    }

    fn probe_exclusion(&self, _path: &str, _skip_queue_check: bool) -> Result<bool, HostError> {
        Ok(false)
    }

    fn post_event(&self, text: &str, severity: Severity) -> Result<(), HostError> {
        self.events.lock().unwrap().push((text.to_string(), severity));
        Ok(())
    }
}
