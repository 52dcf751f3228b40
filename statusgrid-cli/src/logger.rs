//! Minimal stderr logger for the `log` facade

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("statusgrid")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        eprintln!("{}: {}", tag, record.args());
    }

    fn flush(&self) {}
}

/// Level for a `-v` count: warnings by default, then debug, then trace
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger; a second call keeps the first logger
pub fn init(verbosity: u8) {
    let level = level_for(verbosity);
    if let Err(e) = log::set_boxed_logger(Box::new(StderrLogger { level }))
        .map(|()| log::set_max_level(level))
    {
        eprintln!("Warning: failed to install logger: {}", e);
    }
}
