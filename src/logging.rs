#![cfg(feature = "std")]

//! Stderr logging for the console.
//!
//! Command output goes to stdout, so log lines are kept on stderr where a
//! script piping the console can tell them apart.

use std::env;
use std::io::{self, Write};
use std::sync::OnceLock;

use log::{LevelFilter, Log, Metadata, Record};

use crate::config::LOG_ENV_VAR;

/// Writes one `LEVEL target: message` line per record.
struct ConsoleLogger {
    level: LevelFilter,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // a closed stderr must not take the console down with it
        let _ = writeln!(io::stderr().lock(), "{}", format_record(record));
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

/// Render a record the way the console logger prints it.
pub fn format_record(record: &Record) -> String {
    format!("{:<5} {}: {}", record.level(), record.target(), record.args())
}

/// Parse a level name, falling back to `info` for anything unrecognised.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the console logger at the level named by `BATTLESHIP_LOG`.
///
/// Only the first call installs anything; the returned level is the one in
/// effect afterwards.
pub fn init_logging() -> LevelFilter {
    let logger = LOGGER.get_or_init(|| ConsoleLogger {
        level: level_from(env::var(LOG_ENV_VAR).ok().as_deref()),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
    log::max_level()
}
