//! Expansion of command-line selections into candidate video files

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::rules::SubmissionRules;

/// Expand a selection of files and directories into supported video files
///
/// Files are kept in the order given, whether or not they exist; the batch fails
/// on them later with a clear probe error. Directories contribute their supported
/// files sorted by name, either one level deep or recursively.
pub fn expand_selection(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut selected = Vec::new();

    for path in paths {
        if path.is_dir() {
            selected.extend(scan_directory(path, recursive));
        } else {
            selected.push(path.clone());
        }
    }

    SubmissionRules::filter_supported(selected)
}

fn scan_directory(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    let walker = if recursive { walker } else { walker.max_depth(1) };

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| SubmissionRules::is_supported(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.mp4"), b"").unwrap();
        fs::write(dir.path().join("a.MOV"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.avi"), b"").unwrap();
        dir
    }

    #[test]
    fn test_directory_one_level() {
        let dir = setup();
        let found = expand_selection(&[dir.path().to_path_buf()], false);
        assert_eq!(found, vec![dir.path().join("a.MOV"), dir.path().join("b.mp4")]);
    }

    #[test]
    fn test_directory_recursive() {
        let dir = setup();
        let found = expand_selection(&[dir.path().to_path_buf()], true);
        assert_eq!(found.len(), 3);
        assert!(found.contains(&dir.path().join("nested").join("c.avi")));
    }

    #[test]
    fn test_files_keep_order_and_are_filtered() {
        let found = expand_selection(
            &[
                PathBuf::from("z.mp4"),
                PathBuf::from("doc.pdf"),
                PathBuf::from("a.avi"),
            ],
            false,
        );
        assert_eq!(found, vec![PathBuf::from("z.mp4"), PathBuf::from("a.avi")]);
    }
}
