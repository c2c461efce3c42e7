//! Diagnostics for buffer operations
//!
//! Contract violations are reported at ERROR with the file:line of the check
//! that failed; storage changes (resize, detach, truncate) at DEBUG. Output
//! goes to a process-wide `Logger` that applications can replace, e.g. to
//! route buffer diagnostics into the engine's own log.

use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Sink for buffer diagnostics
///
/// ```no_run
/// use galaxy_3d_buffer::galaxy3d::log::{self, Logger, LogEntry, LogSeverity};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{:?} {}: {}", entry.severity, entry.source, entry.message);
///     }
/// }
///
/// log::set_logger(StderrLogger);
/// log::set_min_severity(LogSeverity::Debug);
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One diagnostic record
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, e.g. "galaxy3d::ByteBuffer"
    pub source: String,
    pub message: String,
    /// Location of the failed check (ERROR entries only)
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

/// Severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Trace,
    /// Storage changes (resize, detach, truncate)
    Debug,
    Info,
    Warn,
    /// Contract violations returned as `Error`
    Error,
}

impl LogSeverity {
    /// Fixed-width colored label
    fn label(self) -> ColoredString {
        match self {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        }
    }
}

/// Console logger installed until `set_logger` is called
///
/// Prints `[time] [LEVEL] [source] message`, followed by `(file:line)` when
/// the entry carries a location.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let time: DateTime<Local> = entry.timestamp.into();
        let location = match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(" ({}:{})", file, line),
            _ => String::new(),
        };
        println!(
            "[{}] [{}] [{}] {}{}",
            time.format("%H:%M:%S%.3f"),
            entry.severity.label(),
            entry.source.bright_blue(),
            entry.message,
            location,
        );
    }
}

// ===== GLOBAL LOGGER =====

/// Installed logger plus the minimum severity forwarded to it
struct LoggerState {
    logger: Box<dyn Logger>,
    min_severity: LogSeverity,
}

impl LoggerState {
    fn new() -> Self {
        Self {
            logger: Box::new(DefaultLogger),
            min_severity: LogSeverity::Info,
        }
    }
}

static LOGGER: OnceLock<RwLock<LoggerState>> = OnceLock::new();

fn logger_state() -> &'static RwLock<LoggerState> {
    LOGGER.get_or_init(|| RwLock::new(LoggerState::new()))
}

/// Replace the current logger with a custom implementation
pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut state) = logger_state().write() {
        state.logger = Box::new(logger);
    }
}

/// Restore the DefaultLogger and the default minimum severity (Info)
pub fn reset_logger() {
    if let Ok(mut state) = logger_state().write() {
        *state = LoggerState::new();
    }
}

/// Set the minimum severity forwarded to the logger
///
/// Entries below this level are dropped before reaching the logger.
pub fn set_min_severity(severity: LogSeverity) {
    if let Ok(mut state) = logger_state().write() {
        state.min_severity = severity;
    }
}

/// Current minimum severity
pub fn min_severity() -> LogSeverity {
    logger_state()
        .read()
        .map(|state| state.min_severity)
        .unwrap_or(LogSeverity::Info)
}

/// Log a message without location (used by the buffer_* macros)
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(severity, source, message, None, None);
}

/// Log a message with file:line information (used by buffer_error!/buffer_bail!)
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(severity, source, message, Some(file), Some(line));
}

fn dispatch(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: Option<&'static str>,
    line: Option<u32>,
) {
    if let Ok(state) = logger_state().read() {
        if severity < state.min_severity {
            return;
        }
        state.logger.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file,
            line,
        });
    }
}

// ===== LOGGING MACROS =====

/// Log a formatted message at `$severity` (no location)
#[macro_export]
macro_rules! buffer_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::$severity, $source, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! buffer_trace {
    ($source:expr, $($arg:tt)*) => { $crate::buffer_log!(Trace, $source, $($arg)*) };
}

/// e.g. `buffer_debug!(SOURCE, "Resized from {} to {} bytes", old, new)`
#[macro_export]
macro_rules! buffer_debug {
    ($source:expr, $($arg:tt)*) => { $crate::buffer_log!(Debug, $source, $($arg)*) };
}

#[macro_export]
macro_rules! buffer_info {
    ($source:expr, $($arg:tt)*) => { $crate::buffer_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! buffer_warn {
    ($source:expr, $($arg:tt)*) => { $crate::buffer_log!(Warn, $source, $($arg)*) };
}

/// ERROR with the caller's file:line
#[macro_export]
macro_rules! buffer_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!(),
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
