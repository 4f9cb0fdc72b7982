use std::fs::create_dir_all;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Crates whose records are capped at `warn` whatever the verbosity
const NOISY_TARGETS: [&str; 4] = ["reqwest", "rustls", "hyper", "hyper_util"];

/// Verbosity level for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Progress lines, warnings and errors (default)
    Info,
    /// Adds byte counts, configuration lookup and retry details
    Debug,
    /// Adds the full assistant response for every file
    Trace,
}

impl LogLevel {
    /// Maps the number of `-v` flags to a level
    pub fn from_occurrences(occurrences: u8) -> Self {
        match occurrences {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Initialise the logger with the specified verbosity level
///
/// Messages go to stdout, coloured by level. When `log_file` is given, the
/// same messages are appended to it with a timestamp, level and target.
pub fn init_logger(verbosity: LogLevel, log_file: Option<&Path>) -> Result<()> {
    let mut root = Dispatch::new().level(verbosity.into());
    for target in NOISY_TARGETS {
        root = root.level_for(target, LevelFilter::Warn);
    }

    if let Some(path) = log_file {
        root = root.chain(file_dispatch(path)?);
    }
    root.chain(console_dispatch()).apply()?;

    log::debug!("Logger initialized with verbosity level: {verbosity:?}");
    if let Some(path) = log_file {
        log::debug!("Writing log to {}", path.display());
    }

    Ok(())
}

fn console_dispatch() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::White)
        .trace(Color::BrightBlack);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "\x1B[{}m{}\x1B[0m",
                colors.get_color(&record.level()).to_fg_str(),
                message
            ))
        })
        .chain(std::io::stdout())
}

fn file_dispatch(path: &Path) -> Result<Dispatch> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        create_dir_all(parent)
            .with_context(|| format!("Cannot create log directory {}", parent.display()))?;
    }
    let file = fern::log_file(path)
        .with_context(|| format!("Cannot open log file {}", path.display()))?;

    Ok(Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(file))
}

/// Picks the coloured variant of a message when stdout is a terminal
pub fn format_message(message: &str, colored_message: &str) -> String {
    if atty::is(atty::Stream::Stdout) {
        colored_message.to_string()
    } else {
        message.to_string()
    }
}
