//! Severity levels shared by every emitter and handler

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered severity of a log line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::Debug, Level::Info, Level::Warning, Level::Error, Level::Critical];
    /// Resolve a level name case-insensitively. Whitespace is not stripped.
    /// Resolve a level name case-insensitively.
    /// Unknown names fall back to INFO without signaling the caller.
    pub fn from_name(name: &str) -> Self {
        match name.to_uppercase().as_str() {
            "DEBUG" => Level::Debug,
            "INFO" => Level::Info,
            "WARNING" | "WARN" => Level::Warning,
            "ERROR" => Level::Error,
            "CRITICAL" | "FATAL" => Level::Critical,
            _ => Level::Info,
        }
    }

    /// Upper-case display name
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Level name painted with its console color
    pub fn colored_name(self) -> ColoredString {
        let name = self.name();
        match self {
            Level::Debug => name.cyan(),
            Level::Info => name.normal(),
            Level::Warning => name.yellow(),
            Level::Error => name.red(),
            Level::Critical => name.red().bold(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warning,
            log::Level::Error => Level::Error,
        }
    }
}

/// Inclusive range of levels a handler accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    pub min: Level,
    pub max: Level,
}

impl LevelRange {
    pub fn new(min: Level, max: Level) -> Self {
        Self { min, max }
    }

    /// Every level, DEBUG through CRITICAL
    pub fn all() -> Self {
        Self::new(Level::Debug, Level::Critical)
    }

    /// Whether `level` falls inside the range.
    /// An inverted range (min above max) accepts nothing.
    pub fn accepts(&self, level: Level) -> bool {
        self.min <= level && level <= self.max
    }
}
