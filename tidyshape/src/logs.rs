//! Pipeline progress logging.
//!
//! A process-wide [`Logger`] prints prefixed lines to stderr (stdout is
//! reserved for reshaped output) and keeps a bounded history that
//! callers can drain.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Maximum number of entries kept in the history.
const HISTORY_CAPACITY: usize = 500;

/// Log level, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Success,
    Info,
}

/// Verbosity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    Error,
    Warning,
    Info,
}

impl Verbosity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "quiet" | "off" | "none" => Some(Verbosity::Quiet),
            "error" => Some(Verbosity::Error),
            "warning" | "warn" => Some(Verbosity::Warning),
            "info" | "debug" => Some(Verbosity::Info),
            _ => None,
        }
    }

    fn allows(self, level: LogLevel) -> bool {
        match self {
            Verbosity::Quiet => false,
            Verbosity::Error => level == LogLevel::Error,
            Verbosity::Warning => level <= LogLevel::Warning,
            Verbosity::Info => true,
        }
    }
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth, rendered as indentation
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Line as printed to stderr.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

struct LoggerState {
    verbosity: Verbosity,
    history: VecDeque<LogEntry>,
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Prints and records log entries.
pub struct Logger {
    state: Mutex<LoggerState>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LoggerState {
                verbosity: Verbosity::Info,
                history: VecDeque::with_capacity(HISTORY_CAPACITY),
            }),
        }
    }

    pub fn set_verbosity(&self, verbosity: Verbosity) {
        if let Ok(mut state) = self.state.lock() {
            state.verbosity = verbosity;
        }
    }

    /// Record an entry, printing it when the verbosity allows.
    pub fn log(&self, entry: LogEntry) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.verbosity.allows(entry.level) {
            eprintln!("{}", entry.render());
        }
        if state.history.len() == HISTORY_CAPACITY {
            state.history.pop_front();
        }
        state.history.push_back(entry);
    }

    /// Drain the recorded entries.
    pub fn take_history(&self) -> Vec<LogEntry> {
        match self.state.lock() {
            Ok(mut state) => state.history.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}
