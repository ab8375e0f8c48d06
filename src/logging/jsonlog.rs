use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Error};
use log::{LevelFilter, Log, Metadata, Record};

use super::LogEntry;

/// Writes every record as one JSON object per line into a file.
#[derive(Debug)]
pub struct JsonFileLog {
    target: Mutex<BufWriter<File>>,
    max_level: LevelFilter,
}

impl JsonFileLog {
    /// Creates the log file, truncating any previous content.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::create(path.as_ref()).with_context(|| {
            format!("Failed to create log file '{}'", path.as_ref().display())
        })?;

        Ok(Self {
            target: Mutex::new(BufWriter::new(file)),
            max_level: LevelFilter::Trace,
        })
    }

    pub fn with_max_level(self, max_level: LevelFilter) -> Self {
        Self { max_level, ..self }
    }

    pub fn into_logger(self) -> Box<dyn Log> {
        Box::new(self)
    }

    /// Best effort attempt to write the log entry to the file
    fn write_entry(&self, record: &Record) -> Result<(), Box<dyn std::error::Error + '_>> {
        let mut serialized = serde_json::to_string(&LogEntry::from(record))?;
        serialized.push('\n');

        self.target.lock()?.write_all(serialized.as_bytes())?;
        Ok(())
    }
}

impl Log for JsonFileLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        let _ = self.write_entry(record);
    }

    fn flush(&self) {
        if let Ok(mut target) = self.target.lock() {
            let _ = target.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use log::Level;
    use tempfile::tempdir;

    use super::{super::Level as EntryLevel, *};

    #[test]
    fn test_filter() {
        let test_dir = tempdir().unwrap();
        let logger = JsonFileLog::create(test_dir.path().join("partitioner.log"))
            .unwrap()
            .with_max_level(LevelFilter::Info)
            .into_logger();

        assert!(logger.enabled(&Metadata::builder().level(Level::Info).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    }

    #[test]
    fn test_create_failure() {
        let test_dir = tempdir().unwrap();
        // A directory cannot be opened as a log file
        JsonFileLog::create(test_dir.path()).unwrap_err();
    }

    #[test]
    fn test_truncates_previous_content() {
        let test_dir = tempdir().unwrap();
        let target = test_dir.path().join("partitioner.log");
        fs::write(&target, "stale content\n").unwrap();

        let logger = JsonFileLog::create(&target).unwrap().into_logger();
        logger.log(&Record::builder().args(format_args!("fresh")).build());
        logger.flush();

        let content = fs::read_to_string(&target).unwrap();
        assert!(!content.contains("stale content"));
        assert!(content.contains("fresh"));
    }

    #[test]
    fn test_json_lines() {
        let test_dir = tempdir().unwrap();
        let target = test_dir.path().join("partitioner.log");
        let logger = JsonFileLog::create(&target).unwrap().into_logger();

        for (level, message) in [(Level::Info, "first"), (Level::Warn, "second")] {
            logger.log(
                &Record::builder()
                    .args(format_args!("{message}"))
                    .level(level)
                    .target("partitioner::validation")
                    .file(Some(file!()))
                    .line(Some(42))
                    .build(),
            );
        }
        logger.flush();

        let content = fs::read_to_string(target).unwrap();
        let entries = content
            .lines()
            .map(|line| serde_json::from_str::<LogEntry>(line).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, EntryLevel::Info);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].level, EntryLevel::Warn);
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[1].target, "partitioner::validation");
        assert_eq!(entries[1].file, file!());
        assert_eq!(entries[1].line, 42);
    }
}
