use std::io;
use std::path::{Path, PathBuf};

/// File access used by config discovery, mocked in loader tests.
pub trait FileSystem {
    /// # Errors
    /// Returns an error if `path` cannot be read as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    /// # Errors
    /// Returns an error if the working directory is unavailable.
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Per-user `release-validator` config directory, if the platform has one.
    fn config_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "release-validator")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}
