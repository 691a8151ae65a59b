//! Executable locator
//!
//! Resolves external tools from, in order: the bundled tool directory shipped next
//! to the binary, the directory of the running executable, and every entry of
//! `PATH`. The first regular file wins.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

/// Directory name searched next to the executable when no bundle dir is configured
pub const DEFAULT_BUNDLE_DIR: &str = "bin";

/// Ordered set of directories searched for external tools
#[derive(Debug, Clone, Default)]
pub struct ExecutableLocator {
    bundled_dir: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
    search_path: Vec<PathBuf>,
}

impl ExecutableLocator {
    /// Create a locator with explicit search locations
    pub fn new(
        bundled_dir: Option<PathBuf>,
        exe_dir: Option<PathBuf>,
        search_path: Vec<PathBuf>,
    ) -> Self {
        Self {
            bundled_dir,
            exe_dir,
            search_path,
        }
    }

    /// Create a locator for the running process
    ///
    /// `bundled_dir` overrides the default `<exe_dir>/bin` bundle location.
    pub fn from_env(bundled_dir: Option<PathBuf>) -> Self {
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let bundled_dir = bundled_dir.or_else(|| exe_dir.as_ref().map(|dir| dir.join(DEFAULT_BUNDLE_DIR)));
        let search_path = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();

        Self::new(bundled_dir, exe_dir, search_path)
    }

    /// Resolve a tool name, returning `None` if no location holds it
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let file_name = executable_name(name);

        let found = self
            .bundled_dir
            .iter()
            .chain(self.exe_dir.iter())
            .chain(self.search_path.iter())
            .map(|dir| dir.join(&file_name))
            .find(|candidate| {
                trace!("Checking {}", candidate.display());
                candidate.is_file()
            });

        match &found {
            Some(path) => debug!("Resolved {} to {}", name, path.display()),
            None => debug!("Could not resolve {}", name),
        }
        found
    }
}

/// Append the platform executable suffix when the name lacks it
fn executable_name(name: &str) -> OsString {
    let suffix = env::consts::EXE_SUFFIX;
    let mut file_name = OsString::from(name);
    if !suffix.is_empty() && !name.to_ascii_lowercase().ends_with(suffix) {
        file_name.push(suffix);
    }
    file_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(executable_name(name));
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        path
    }

    #[test]
    fn test_not_found_anywhere() {
        let bundle = TempDir::new().unwrap();
        let exe = TempDir::new().unwrap();
        let path_dir = TempDir::new().unwrap();

        let locator = ExecutableLocator::new(
            Some(bundle.path().to_path_buf()),
            Some(exe.path().to_path_buf()),
            vec![path_dir.path().to_path_buf()],
        );

        assert_eq!(locator.locate("ffmpeg"), None);
    }

    #[test]
    fn test_found_only_on_search_path() {
        let bundle = TempDir::new().unwrap();
        let exe = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = touch(second.path(), "ffprobe");

        let locator = ExecutableLocator::new(
            Some(bundle.path().to_path_buf()),
            Some(exe.path().to_path_buf()),
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
        );

        assert_eq!(locator.locate("ffprobe"), Some(expected));
    }

    #[test]
    fn test_bundle_wins_over_exe_dir_and_path() {
        let bundle = TempDir::new().unwrap();
        let exe = TempDir::new().unwrap();
        let path_dir = TempDir::new().unwrap();
        let expected = touch(bundle.path(), "ffmpeg");
        touch(exe.path(), "ffmpeg");
        touch(path_dir.path(), "ffmpeg");

        let locator = ExecutableLocator::new(
            Some(bundle.path().to_path_buf()),
            Some(exe.path().to_path_buf()),
            vec![path_dir.path().to_path_buf()],
        );

        assert_eq!(locator.locate("ffmpeg"), Some(expected));
    }

    #[test]
    fn test_exe_dir_wins_over_path() {
        let exe = TempDir::new().unwrap();
        let path_dir = TempDir::new().unwrap();
        let expected = touch(exe.path(), "ffmpeg");
        touch(path_dir.path(), "ffmpeg");

        let locator = ExecutableLocator::new(
            None,
            Some(exe.path().to_path_buf()),
            vec![path_dir.path().to_path_buf()],
        );

        assert_eq!(locator.locate("ffmpeg"), Some(expected));
    }

    #[test]
    fn test_directories_are_not_matches() {
        let path_dir = TempDir::new().unwrap();
        fs::create_dir(path_dir.path().join(executable_name("ffmpeg"))).unwrap();

        let locator = ExecutableLocator::new(None, None, vec![path_dir.path().to_path_buf()]);

        assert_eq!(locator.locate("ffmpeg"), None);
    }

    #[test]
    fn test_tools_resolve_independently() {
        let path_dir = TempDir::new().unwrap();
        touch(path_dir.path(), "ffmpeg");

        let locator = ExecutableLocator::new(None, None, vec![path_dir.path().to_path_buf()]);

        assert!(locator.locate("ffmpeg").is_some());
        assert!(locator.locate("ffprobe").is_none());
    }
}
