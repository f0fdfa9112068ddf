use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One line of the in-window log. `level` is what the window colors by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: log::Level,
    pub text: String,
}

impl LogLine {
    pub fn is_error(&self) -> bool {
        self.level <= log::Level::Warn
    }
}

/// Collects timestamped lines for the in-window log and mirrors them to the `log` facade.
#[derive(Clone)]
pub struct Logger {
    lines: Arc<Mutex<Vec<LogLine>>>,
}

impl Logger {
    pub fn new(lines: Arc<Mutex<Vec<LogLine>>>) -> Self {
        Logger { lines }
    }

    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.push(log::Level::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.push(log::Level::Error, message);
    }

    fn push(&self, level: log::Level, message: String) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.lines.lock().push(LogLine {
            level,
            text: format!("[{}] {}", timestamp, message),
        });
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

pub fn measure_time<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();
    (result, duration)
}

pub fn get_memory_usage() -> String {
    if let Ok(mem_info) = sys_info::mem_info() {
        format!(
            "Memory: Total: {} MB, Free: {} MB, Used: {} MB",
            mem_info.total / 1024,
            mem_info.free / 1024,
            mem_info.total.saturating_sub(mem_info.free) / 1024
        )
    } else {
        "Unable to get memory info".to_string()
    }
}

/// Human-readable byte size, MB above one megabyte and KB below.
pub fn format_size(bytes: u64) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    if mb >= 1.0 {
        format!("{:.2} MB", mb)
    } else {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    }
}
