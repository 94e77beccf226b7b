use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};

/// Default log file, next to where the tool is run.
pub const LOG_FILE: &str = "debug.log";

/// Writes `[timestamp] LEVEL message` lines to a file, keeping the terminal free for the dialog.
pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    pub fn new(file: File, level: LevelFilter) -> Self {
        Self {
            file: Mutex::new(file),
            level,
        }
    }
}

pub fn format_line(level: log::Level, target: &str, message: &std::fmt::Arguments) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] {:<5} {}: {}", timestamp, level, target, message)
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", format_line(record.level(), record.target(), record.args()));
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Truncate `path` and route the `log` macros into it.
pub fn init_logging(path: &Path, level: LevelFilter) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    log::set_boxed_logger(Box::new(FileLogger::new(file, level)))
        .map(|()| log::set_max_level(level))
        .context("Logger already initialized")?;
    Ok(())
}
