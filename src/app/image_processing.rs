// image_processing.rs
use crate::app::{App, ConversionProgress, ConversionUpdate, ImageStatus, JobState};
use png_webp_converter::batch::convert_files_with;
use png_webp_converter::utils::{get_memory_usage, Logger};
use png_webp_converter::ConversionSettings;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::time::Instant;

/// Captures the current settings and starts converting the queue on a worker thread.
pub fn start_conversion(app: &mut App) {
    if app.is_converting() || app.queue.is_empty() {
        return;
    }
    let settings = match app.settings() {
        Some(settings) => settings,
        None => {
            app.logger.error(format!("Invalid quality: {}", app.quality));
            return;
        }
    };

    let job_indices = app.files_to_convert();
    for &index in &job_indices {
        let image = &mut app.queue[index];
        image.status = ImageStatus::Pending;
        image.converted_size = None;
    }
    let input_files: Vec<PathBuf> = job_indices.iter().map(|&i| app.queue[i].path.clone()).collect();
    app.job_indices = job_indices;

    app.logger.log(format!(
        "Starting conversion of {} image(s), quality {}, output: {}",
        input_files.len(),
        settings.quality,
        settings
            .output_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "same folder as input".to_string())
    ));

    app.progress = ConversionProgress {
        total: input_files.len(),
        ..Default::default()
    };
    app.stop_requested.store(false, Ordering::Relaxed);
    app.state = JobState::Converting;
    app.conversion_start_time = Some(Instant::now());

    let (sender, receiver) = channel();
    app.conversion_receiver = Some(receiver);

    let stop = app.stop_requested.clone();
    let logger = app.logger.clone();
    std::thread::spawn(move || {
        convert_images(&input_files, &settings, &stop, &logger, |update| {
            // A closed channel means the window is gone; nothing left to report to.
            let _ = sender.send(update);
        });
    });
}

/// Worker body: converts files one after another and hands each update to `report`.
///
/// `Started(i + 1)` is only announced while no stop has been requested.
pub fn convert_images<F>(
    input_files: &[PathBuf],
    settings: &ConversionSettings,
    stop: &AtomicBool,
    logger: &Logger,
    mut report: F,
) where
    F: FnMut(ConversionUpdate),
{
    log::debug!("{}", get_memory_usage());
    if input_files.is_empty() {
        logger.log("No images to convert.");
    } else if !stop.load(Ordering::Relaxed) {
        report(ConversionUpdate::Started(0));
    }

    let summary = convert_files_with(input_files, settings, stop, |index, result| {
        let output_size = result
            .output()
            .and_then(|path| std::fs::metadata(path).ok())
            .map(|m| m.len());
        report(ConversionUpdate::Finished {
            index,
            success: result.is_success(),
            output_size,
            message: result.message(),
        });
        if index + 1 < input_files.len() && !stop.load(Ordering::Relaxed) {
            report(ConversionUpdate::Started(index + 1));
        }
    });

    let stopped = summary.attempted < input_files.len();
    log::debug!("{}", get_memory_usage());
    report(ConversionUpdate::Completed { summary, stopped });
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use png_webp_converter::Quality;
    use std::path::Path;
    use std::sync::mpsc::Receiver;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn write_pngs(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                image::RgbImage::from_pixel(5, 3, image::Rgb([1, 2, 3])).save(&path).unwrap();
                path
            })
            .collect()
    }

    fn logger() -> Logger {
        Logger::new(Arc::new(Mutex::new(Vec::new())))
    }

    fn drain(receiver: Receiver<ConversionUpdate>) -> Vec<String> {
        receiver
            .iter()
            .map(|update| match update {
                ConversionUpdate::Started(i) => format!("started {}", i),
                ConversionUpdate::Finished { index, success, .. } => format!("finished {} {}", index, success),
                ConversionUpdate::Completed { summary, stopped } => {
                    format!("completed {}/{} stopped={}", summary.succeeded, summary.attempted, stopped)
                }
            })
            .collect()
    }

    #[test]
    fn full_run_reports_every_file_in_order() {
        let dir = tempdir().unwrap();
        let files = write_pngs(dir.path(), &["one.png", "two.png"]);
        let settings = ConversionSettings::new(Some(dir.path().join("out")), Quality::default());
        let stop = AtomicBool::new(false);

        let (sender, receiver) = channel();
        convert_images(&files, &settings, &stop, &logger(), |update| sender.send(update).unwrap());
        drop(sender);

        assert_eq!(
            drain(receiver),
            vec![
                "started 0",
                "finished 0 true",
                "started 1",
                "finished 1 true",
                "completed 2/2 stopped=false",
            ]
        );
    }

    #[test]
    fn stop_after_first_file_leaves_the_rest_untouched() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let files = write_pngs(dir.path(), &["one.png", "two.png"]);
        let settings = ConversionSettings::new(Some(out.clone()), Quality::default());
        let stop = AtomicBool::new(false);

        let (sender, receiver) = channel();
        convert_images(&files, &settings, &stop, &logger(), |update| {
            if let ConversionUpdate::Finished { index: 0, .. } = update {
                stop.store(true, Ordering::Relaxed);
            }
            sender.send(update).unwrap();
        });
        drop(sender);

        assert_eq!(
            drain(receiver),
            vec!["started 0", "finished 0 true", "completed 1/1 stopped=true"]
        );
        assert!(out.join("one.webp").exists());
        assert!(!out.join("two.webp").exists());
    }

    #[test]
    fn stop_before_start_converts_nothing() {
        let dir = tempdir().unwrap();
        let files = write_pngs(dir.path(), &["one.png"]);
        let settings = ConversionSettings::new(Some(dir.path().join("out")), Quality::default());
        let stop = AtomicBool::new(true);

        let (sender, receiver) = channel();
        convert_images(&files, &settings, &stop, &logger(), |update| sender.send(update).unwrap());
        drop(sender);

        assert_eq!(drain(receiver), vec!["completed 0/0 stopped=true"]);
        assert!(!dir.path().join("out").exists());
    }
}
