//! Line formatting for console and file handlers
//!
//! Every line reads `<timestamp> - <emitter> - <line> - <LEVEL> - <message>`.
//! Only the level name is painted, and only on colorized handlers.

use chrono::{DateTime, Local};

use crate::level::Level;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// One log line before formatting
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub emitter: &'a str,
    pub level: Level,
    pub line: u32,
    pub message: &'a str,
    pub time: DateTime<Local>,
}

impl<'a> Record<'a> {
    pub fn new(emitter: &'a str, level: Level, line: u32, message: &'a str) -> Self {
        Self {
            emitter,
            level,
            line,
            message,
            time: Local::now(),
        }
    }
}

/// Renders records; the colorized variant is used for the console streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    colorize: bool,
}

impl LineFormat {
    pub fn colored() -> Self {
        Self { colorize: true }
    }

    pub fn plain() -> Self {
        Self { colorize: false }
    }

    pub fn is_colorized(&self) -> bool {
        self.colorize
    }

    pub fn format(&self, record: &Record<'_>) -> String {
        let level = if self.colorize {
            record.level.colored_name().to_string()
        } else {
            record.level.name().to_string()
        };

        format!(
            "{} - {} - {} - {} - {}",
            record.time.format(TIMESTAMP_FORMAT),
            record.emitter,
            record.line,
            level,
            record.message
        )
    }
}
