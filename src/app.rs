// app.rs
pub mod file_dialogs;
pub mod gui;
pub mod image_processing;

use eframe::egui;
use eframe::App as EframeApp;
use eframe::NativeOptions;
use parking_lot::Mutex;
use png_webp_converter::batch::{collect_images, BatchSummary};
use png_webp_converter::format::classify;
use png_webp_converter::convert::estimate_output_size;
use png_webp_converter::utils::{LogLine, Logger};
use png_webp_converter::{ConversionSettings, Quality};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Instant;

pub fn run() {
    let native_options = NativeOptions {
        initial_window_size: Some(egui::Vec2::new(1000.0, 700.0)),
        resizable: true,
        drag_and_drop_support: true,
        ..Default::default()
    };
    eframe::run_native(
        "PNG / WebP Converter",
        native_options,
        Box::new(|_cc| Box::new(App::default())),
    );
}

pub struct App {
    pub queue: Vec<QueuedImage>,
    /// Empty means "next to each input".
    pub output_folder: String,
    pub quality: u8,
    pub state: JobState,
    pub progress: ConversionProgress,
    pub log_messages: Arc<Mutex<Vec<LogLine>>>,
    pub logger: Logger,
    pub stop_requested: Arc<AtomicBool>,
    pub conversion_receiver: Option<Receiver<ConversionUpdate>>,
    pub conversion_start_time: Option<Instant>,
    /// Queue index of each file in the running job, by worker index.
    pub job_indices: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Converting,
}

pub enum ConversionUpdate {
    Started(usize),
    Finished {
        index: usize,
        success: bool,
        output_size: Option<u64>,
        message: String,
    },
    Completed { summary: BatchSummary, stopped: bool },
}

#[derive(Debug, Default, Clone)]
pub struct ConversionProgress {
    pub total: usize,
    pub completed: usize,
    pub current: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    Pending,
    Processing,
    Converted,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct QueuedImage {
    pub path: PathBuf,
    pub name: String,
    pub original_size: u64,
    pub converted_size: Option<u64>,
    pub status: ImageStatus,
    pub selected: bool,
}

impl QueuedImage {
    fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let original_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self {
            path,
            name,
            original_size,
            converted_size: None,
            status: ImageStatus::Pending,
            selected: false,
        }
    }

    /// Rough output size for the current quality, shown before converting.
    pub fn estimated_size(&self, quality: u8) -> Option<u64> {
        let quality = Quality::new(quality).ok()?;
        let target = classify(&self.path).target()?;
        Some(estimate_output_size(self.original_size, target, quality))
    }
}

impl Default for App {
    fn default() -> Self {
        let log_messages = Arc::new(Mutex::new(Vec::new()));
        Self {
            queue: Vec::new(),
            output_folder: String::new(),
            quality: Quality::DEFAULT.get(),
            state: JobState::Idle,
            progress: ConversionProgress::default(),
            logger: Logger::new(log_messages.clone()),
            log_messages,
            stop_requested: Arc::new(AtomicBool::new(false)),
            conversion_receiver: None,
            conversion_start_time: None,
            job_indices: Vec::new(),
        }
    }
}

impl App {
    pub fn is_converting(&self) -> bool {
        self.state == JobState::Converting
    }

    /// Adds dropped or picked paths to the queue. Folders contribute their
    /// top-level images; unsupported files are logged and skipped. Returns
    /// how many new entries were queued.
    pub fn add_paths(&mut self, paths: Vec<PathBuf>) -> usize {
        let mut added = 0;
        for path in paths {
            let candidates = if path.is_dir() {
                collect_images(&path, false, None)
            } else if path.is_file() && classify(&path).is_supported() {
                vec![path]
            } else {
                self.logger.log(format!("Skipped (unsupported): {}", path.display()));
                continue;
            };

            for candidate in candidates {
                if self.queue.iter().any(|queued| queued.path == candidate) {
                    continue;
                }
                self.queue.push(QueuedImage::new(candidate));
                added += 1;
            }
        }

        if added > 0 {
            self.logger.log(format!(
                "Added {} file(s) to queue. Total: {}",
                added,
                self.queue.len()
            ));
        } else {
            self.logger.log("No new supported images found.");
        }
        added
    }

    pub fn clear_queue(&mut self) {
        if !self.is_converting() {
            self.queue.clear();
            self.progress = ConversionProgress::default();
        }
    }

    pub fn has_selection(&self) -> bool {
        self.queue.iter().any(|image| image.selected)
    }

    pub fn select_all(&mut self) {
        for image in self.queue.iter_mut() {
            image.selected = true;
        }
    }

    /// Drops the selected entries from the queue. Returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        if self.is_converting() {
            return 0;
        }
        let before = self.queue.len();
        self.queue.retain(|image| !image.selected);
        let removed = before - self.queue.len();
        if removed == 0 {
            self.logger.log("No images selected to remove.");
        } else {
            self.progress = ConversionProgress::default();
            self.logger.log(format!("Removed {} file(s). Total: {}", removed, self.queue.len()));
        }
        removed
    }

    /// Queue indices a new job should convert: the selection, or everything.
    pub fn files_to_convert(&self) -> Vec<usize> {
        if self.has_selection() {
            (0..self.queue.len()).filter(|&i| self.queue[i].selected).collect()
        } else {
            (0..self.queue.len()).collect()
        }
    }

    /// Snapshot of the controls taken when a job starts.
    pub fn settings(&self) -> Option<ConversionSettings> {
        let quality = Quality::new(self.quality).ok()?;
        let folder = self.output_folder.trim();
        let output_dir = if folder.is_empty() {
            None
        } else {
            Some(PathBuf::from(folder))
        };
        Some(ConversionSettings::new(output_dir, quality))
    }

    pub fn request_stop(&self) {
        if self.is_converting() {
            self.stop_requested.store(true, Ordering::Relaxed);
            self.logger.log("Stopping conversion...");
        }
    }

    fn apply_update(&mut self, update: ConversionUpdate) {
        match update {
            ConversionUpdate::Started(index) => {
                let index = self.queue_index(index);
                self.progress.current = index;
                if let Some(image) = index.and_then(|i| self.queue.get_mut(i)) {
                    image.status = ImageStatus::Processing;
                }
            }
            ConversionUpdate::Finished {
                index,
                success,
                output_size,
                message,
            } => {
                self.progress.completed += 1;
                self.progress.current = None;
                let index = self.queue_index(index);
                if let Some(image) = index.and_then(|i| self.queue.get_mut(i)) {
                    if success {
                        image.status = ImageStatus::Converted;
                        image.converted_size = output_size;
                    } else {
                        image.status = ImageStatus::Failed(message.clone());
                    }
                }
                if success {
                    self.logger.log(format!("  ✓ {}", message));
                } else {
                    self.logger.error(format!("  ✗ {}", message));
                }
            }
            ConversionUpdate::Completed { summary, stopped } => {
                if stopped {
                    self.logger.log("Conversion stopped by user");
                }
                for image in self.queue.iter_mut() {
                    if image.status == ImageStatus::Processing {
                        image.status = ImageStatus::Pending;
                    }
                    image.selected = false;
                }
                self.job_indices.clear();
                let elapsed = self
                    .conversion_start_time
                    .take()
                    .map(|start| format!(" in {:.1?}", start.elapsed()))
                    .unwrap_or_default();
                self.logger.log(format!(
                    "Conversion complete{}: {} succeeded, {} failed, {} total",
                    elapsed,
                    summary.succeeded,
                    summary.failed,
                    self.progress.total
                ));
                self.state = JobState::Idle;
                self.conversion_receiver = None;
            }
        }
    }
}

impl App {
    fn queue_index(&self, worker_index: usize) -> Option<usize> {
        self.job_indices.get(worker_index).copied()
    }
}

impl EframeApp for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut needs_redraw = false;

        let mut updates = Vec::new();
        if let Some(receiver) = &self.conversion_receiver {
            while let Ok(update) = receiver.try_recv() {
                updates.push(update);
            }
        }
        for update in updates {
            self.apply_update(update);
            needs_redraw = true;
        }

        let dropped: Vec<PathBuf> = ctx
            .input()
            .raw
            .dropped_files
            .iter()
            .filter_map(|file| file.path.clone())
            .collect();
        if !dropped.is_empty() {
            if self.is_converting() {
                self.logger.log("Conversion in progress; drop ignored.");
            } else {
                self.add_paths(dropped);
            }
        }

        gui::render(self, ctx);

        // The worker only talks through the channel, so keep polling while it runs.
        if needs_redraw || self.is_converting() {
            ctx.request_repaint();
        }
    }
}
