//! Folder-wide conversion.
//!
//! The candidate list is fixed before the first file is converted, so files
//! written during the run are never picked up again.

use crate::convert::{convert_file, ConversionResult, ConversionSettings};
use crate::error::BatchError;
use crate::format::classify;
use crate::quality::Quality;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use walkdir::WalkDir;

/// Subfolder of the source that receives outputs when no output folder is given.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "converted";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub source: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub quality: Quality,
    pub recursive: bool,
}

impl BatchOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: None,
            quality: Quality::default(),
            recursive: false,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.source.join(DEFAULT_OUTPUT_SUBDIR))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<String>,
}

impl BatchSummary {
    pub fn record(&mut self, result: &ConversionResult) {
        self.attempted += 1;
        if result.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failures.push(result.message());
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Lists convertible files under `source`.
///
/// Only the top level is listed unless `recursive` is set. Anything inside
/// `exclude` (normally the output folder) is skipped. Entries that cannot be
/// read are logged and skipped.
pub fn collect_images(source: &Path, recursive: bool, exclude: Option<&Path>) -> Vec<PathBuf> {
    let excluded = exclude.and_then(|dir| fs::canonicalize(dir).ok());
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(source)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            match (&excluded, fs::canonicalize(entry.path())) {
                (Some(excluded), Ok(path)) => &path != excluded,
                _ => true,
            }
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| classify(path).is_supported())
        .collect()
}

/// Converts every file in `files` in order, reporting each result to
/// `on_result`. `stop` is checked before each file; once set, the remaining
/// files are left untouched and not counted.
pub fn convert_files_with<F>(
    files: &[PathBuf],
    settings: &ConversionSettings,
    stop: &AtomicBool,
    mut on_result: F,
) -> BatchSummary
where
    F: FnMut(usize, &ConversionResult),
{
    let mut summary = BatchSummary::default();
    for (index, path) in files.iter().enumerate() {
        if stop.load(Ordering::Relaxed) {
            info!("Stopped after {} of {} files", index, files.len());
            break;
        }
        let result = convert_file(&settings.request_for(path));
        summary.record(&result);
        on_result(index, &result);
    }
    summary
}

/// Converts a whole folder. See [`convert_folder_with`].
pub fn convert_folder(options: &BatchOptions) -> Result<BatchSummary, BatchError> {
    convert_folder_with(options, |_, _| {})
}

/// Converts a whole folder, calling `on_result` after each file.
///
/// Fails only when the source is not a directory or the output folder
/// cannot be created; per-file errors end up in the summary.
pub fn convert_folder_with<F>(options: &BatchOptions, on_result: F) -> Result<BatchSummary, BatchError>
where
    F: FnMut(usize, &ConversionResult),
{
    if !options.source.is_dir() {
        return Err(BatchError::SourceNotDir(options.source.clone()));
    }

    let output_dir = options.output_dir();
    fs::create_dir_all(&output_dir).map_err(|source| BatchError::OutputDir {
        path: output_dir.clone(),
        source,
    })?;

    let files = collect_images(&options.source, options.recursive, Some(&output_dir));
    debug!(
        "Found {} image(s) in {} (recursive: {})",
        files.len(),
        options.source.display(),
        options.recursive
    );

    let settings = ConversionSettings::new(Some(output_dir), options.quality);
    let never_stop = AtomicBool::new(false);
    Ok(convert_files_with(&files, &settings, &never_stop, on_result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn collect_skips_non_images_and_respects_depth() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.png")).unwrap();
        File::create(dir.path().join("b.JPG")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested").join("c.webp")).unwrap();

        let mut top = collect_images(dir.path(), false, None);
        top.sort();
        assert_eq!(top, vec![dir.path().join("a.png"), dir.path().join("b.JPG")]);

        let all = collect_images(dir.path(), true, None);
        assert_eq!(all.len(), 3);
        assert!(all.contains(&dir.path().join("nested").join("c.webp")));
    }

    #[test]
    fn collect_excludes_output_folder() {
        let dir = tempdir().unwrap();
        let out = dir.path().join(DEFAULT_OUTPUT_SUBDIR);
        fs::create_dir(&out).unwrap();
        File::create(out.join("old.webp")).unwrap();
        File::create(dir.path().join("a.png")).unwrap();

        let files = collect_images(dir.path(), true, Some(&out));
        assert_eq!(files, vec![dir.path().join("a.png")]);
    }

    #[test]
    fn summary_counts_add_up() {
        let mut summary = BatchSummary::default();
        summary.record(&ConversionResult {
            input: PathBuf::from("a.png"),
            outcome: Ok(PathBuf::from("a.webp")),
        });
        summary.record(&ConversionResult {
            input: PathBuf::from("b.gif"),
            outcome: Err(crate::ConvertError::Unsupported(PathBuf::from("b.gif"))),
        });
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn stop_flag_prevents_any_conversion() {
        let files = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let stop = AtomicBool::new(true);
        let mut seen = 0;
        let summary = convert_files_with(&files, &ConversionSettings::default(), &stop, |_, _| seen += 1);
        assert_eq!(summary.attempted, 0);
        assert_eq!(seen, 0);
    }

    #[test]
    fn source_must_be_a_directory() {
        let err = convert_folder(&BatchOptions::new("surely_this_folder_does_not_exist_42")).unwrap_err();
        assert!(matches!(err, BatchError::SourceNotDir(_)));
    }
}
