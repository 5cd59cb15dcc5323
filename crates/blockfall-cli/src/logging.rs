//! File logger for the `log` facade.
//!
//! The terminal belongs to the UI while a game is running, so log records go
//! to a file instead of stderr.

use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write as _},
    path::Path,
    sync::Mutex,
};

use anyhow::Context as _;
use log::{LevelFilter, Log, Metadata, Record};

#[derive(Debug)]
struct FileLogger {
    level: LevelFilter,
    writer: Mutex<BufWriter<File>>,
}

impl FileLogger {
    fn open(path: &Path, level: LevelFilter) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        Ok(Self {
            level,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let _ = writeln!(
            writer,
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Installs a global logger appending to `path`.
pub(crate) fn init_file_logger(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let logger = FileLogger::open(path, level)?;
    log::set_boxed_logger(Box::new(logger)).context("Failed to install logger")?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use log::Level;

    use super::*;

    fn emit(logger: &FileLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("blockfall_engine::engine")
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn test_file_logger_filters_and_formats() {
        let path = std::env::temp_dir().join(format!("blockfall-log-{}.log", std::process::id()));
        let _ = fs::remove_file(&path);

        let logger = FileLogger::open(&path, LevelFilter::Info).unwrap();
        emit(&logger, Level::Debug, "spawned T");
        emit(&logger, Level::Info, "game over");
        logger.flush();

        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("INFO  [blockfall_engine::engine] game over"));
    }
}
