use log::{LevelFilter, Log, Metadata, Record};

/// Fans every record out to a set of loggers.
///
/// Target filters apply before any logger sees a record: a record whose target
/// starts with a filtered prefix is dropped when its level exceeds the
/// filter's level. The longest matching prefix wins.
pub struct MultiLogger {
    loggers: Vec<Box<dyn Log>>,
    target_filters: Vec<(String, LevelFilter)>,
    max_level: LevelFilter,
}

impl Default for MultiLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiLogger {
    pub fn new() -> Self {
        Self {
            loggers: Vec::new(),
            target_filters: Vec::new(),
            max_level: LevelFilter::Trace,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn Log>) -> Self {
        self.add_logger(logger);
        self
    }

    pub fn with_max_level(mut self, max_level: LevelFilter) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_target_filter(mut self, target: impl Into<String>, level: LevelFilter) -> Self {
        self.target_filters.push((target.into(), level));
        self
    }

    pub fn add_logger(&mut self, logger: Box<dyn Log>) {
        self.loggers.push(logger);
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_max_level(self.max_level);
        log::set_boxed_logger(Box::new(self))
    }

    fn passes_filters(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.max_level {
            return false;
        }

        self.target_filters
            .iter()
            .filter(|(target, _)| metadata.target().starts_with(target.as_str()))
            .max_by_key(|(target, _)| target.len())
            .map_or(true, |(_, level)| metadata.level() <= *level)
    }
}

impl Log for MultiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.passes_filters(metadata) && self.loggers.iter().any(|l| l.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        if !self.passes_filters(record.metadata()) {
            return;
        }

        self.loggers
            .iter()
            .filter(|l| l.enabled(record.metadata()))
            .for_each(|l| l.log(record));
    }

    fn flush(&self) {
        self.loggers.iter().for_each(|l| l.flush());
    }
}
