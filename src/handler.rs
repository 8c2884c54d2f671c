//! Output handlers attached to emitters
//!
//! A handler pairs a destination with the range of levels it accepts and the
//! line format it renders. Handlers are never adjusted after construction;
//! reconfiguration replaces them wholesale, and every new handler gets a fresh id.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::format::{LineFormat, Record};
use crate::level::{Level, LevelRange};
use crate::rotating::RotatingFile;
use crate::sink::{ConsoleSink, Stream};

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// Log file shared by every emitter's file handler
pub type SharedFile = Arc<Mutex<RotatingFile>>;

enum Destination {
    Console { stream: Stream, sink: Arc<dyn ConsoleSink> },
    File(SharedFile),
}

/// Where a handler writes, as seen from outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

/// Snapshot of an attached handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerInfo {
    pub id: u64,
    pub target: HandlerTarget,
    pub levels: LevelRange,
    pub colorized: bool,
}

impl HandlerInfo {
    pub fn is_file(&self) -> bool {
        matches!(self.target, HandlerTarget::File(_))
    }
}

pub struct Handler {
    id: u64,
    destination: Destination,
    levels: LevelRange,
    format: LineFormat,
}

impl Handler {
    /// stdout carries everything from `level` up to, but not including, WARNING
    pub fn stdout(level: Level, sink: Arc<dyn ConsoleSink>) -> Self {
        Self::new(
            Destination::Console {
                stream: Stream::Stdout,
                sink,
            },
            LevelRange::new(level, Level::Info),
            LineFormat::colored(),
        )
    }

    /// stderr always carries WARNING through CRITICAL
    pub fn stderr(sink: Arc<dyn ConsoleSink>) -> Self {
        Self::new(
            Destination::Console {
                stream: Stream::Stderr,
                sink,
            },
            LevelRange::new(Level::Warning, Level::Critical),
            LineFormat::colored(),
        )
    }

    /// The file receives every level, uncolored
    pub fn file(file: SharedFile) -> Self {
        Self::new(Destination::File(file), LevelRange::all(), LineFormat::plain())
    }

    fn new(destination: Destination, levels: LevelRange, format: LineFormat) -> Self {
        Self {
            id: NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed),
            destination,
            levels,
            format,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn accepts(&self, level: Level) -> bool {
        self.levels.accepts(level)
    }

    /// Write the record if its level is in range.
    /// Write failures are dropped so logging never fails the caller.
    pub fn handle(&self, record: &Record<'_>) {
        if !self.accepts(record.level) {
            return;
        }

        let line = self.format.format(record);
        match &self.destination {
            Destination::Console { stream, sink } => {
                let _ = sink.write_line(*stream, &line);
            }
            Destination::File(file) => {
                let _ = file.lock().unwrap_or_else(PoisonError::into_inner).write_line(&line);
            }
        }
    }

    pub fn info(&self) -> HandlerInfo {
        let target = match &self.destination {
            Destination::Console {
                stream: Stream::Stdout, ..
            } => HandlerTarget::Stdout,
            Destination::Console {
                stream: Stream::Stderr, ..
            } => HandlerTarget::Stderr,
            Destination::File(file) => {
                HandlerTarget::File(file.lock().unwrap_or_else(PoisonError::into_inner).path().to_path_buf())
            }
        };

        HandlerInfo {
            id: self.id,
            target,
            levels: self.levels,
            colorized: self.format.is_colorized(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id)
            .field("levels", &self.levels)
            .field("colorized", &self.format.is_colorized())
            .finish()
    }
}
