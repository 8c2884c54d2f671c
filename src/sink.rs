//! Console sinks
//!
//! Console handlers never touch `std::io` directly; they hand finished lines
//! to a [`ConsoleSink`]. The default sink writes to the process streams, and
//! [`BufferSink`] keeps lines in memory so callers can inspect what went where.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Which console stream a line goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Destination for console output
pub trait ConsoleSink: Send + Sync {
    fn write_line(&self, stream: Stream, line: &str) -> io::Result<()>;
}

/// Writes to the real stdout and stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioSink;

impl ConsoleSink for StdioSink {
    fn write_line(&self, stream: Stream, line: &str) -> io::Result<()> {
        match stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{}", line)?;
                out.flush()
            }
            Stream::Stderr => {
                let mut err = io::stderr().lock();
                writeln!(err, "{}", line)?;
                err.flush()
            }
        }
    }
}

/// Captures console lines in memory, per stream
#[derive(Debug, Default)]
pub struct BufferSink {
    stdout: Mutex<Vec<String>>,
    stderr: Mutex<Vec<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written to stdout so far
    pub fn stdout(&self) -> Vec<String> {
        self.stdout.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Lines written to stderr so far
    pub fn stderr(&self) -> Vec<String> {
        self.stderr.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.stdout.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.stderr.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ConsoleSink for BufferSink {
    fn write_line(&self, stream: Stream, line: &str) -> io::Result<()> {
        let buffer = match stream {
            Stream::Stdout => &self.stdout,
            Stream::Stderr => &self.stderr,
        };
        buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}
