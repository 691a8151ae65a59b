// Domain rules - Business logic and policies

use std::path::{Path, PathBuf};

use crate::domain::model::*;

#[cfg(test)]
mod tests;

/// Container extensions accepted for submission
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// Suffix appended to the input stem for every processed file
pub const OUTPUT_SUFFIX: &str = "_processed";

/// Container written for every processed file
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Rules for what may enter a batch
pub struct SubmissionRules;

impl SubmissionRules {
    /// Check whether a path carries an accepted video extension
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Drop unsupported paths, keeping submission order
    pub fn filter_supported<I, P>(paths: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths
            .into_iter()
            .map(Into::into)
            .filter(|path| Self::is_supported(path))
            .collect()
    }

    /// Build a batch from a selection, filtering and de-duplicating as it goes
    pub fn assemble<I, P>(paths: I, compress: bool) -> Batch
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut batch = Batch::new(compress);
        for path in Self::filter_supported(paths) {
            if !batch.add(path.clone()) {
                tracing::debug!("Skipping duplicate submission: {}", path.display());
            }
        }
        batch
    }
}

/// Naming rule for processed output files
pub struct OutputNaming;

impl OutputNaming {
    /// `<dir>/<stem>_processed.mp4`; always the same path for the same input
    pub fn output_path(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        input.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, OUTPUT_EXTENSION))
    }
}
