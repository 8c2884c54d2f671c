//! Named log emitters
//!
//! An emitter owns the handlers the manager last wired into it. It passes
//! every level through (its own threshold is DEBUG) and leaves filtering to
//! the handlers. Emitters form no hierarchy; nothing propagates to a parent.

use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::format::Record;
use crate::handler::{Handler, HandlerInfo};
use crate::level::Level;

pub struct Emitter {
    name: String,
    handlers: RwLock<Vec<Handler>>,
    rebuilds: AtomicU64,
}

impl Emitter {
    pub(crate) fn new(name: impl Into<String>, handlers: Vec<Handler>) -> Self {
        Self {
            name: name.into(),
            handlers: RwLock::new(handlers),
            rebuilds: AtomicU64::new(0),
        }
    }

    /// Drop every attached handler and attach `handlers` in their place
    pub(crate) fn replace_handlers(&self, handlers: Vec<Handler>) {
        let mut attached = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        attached.clear();
        attached.extend(handlers);
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Emitter-level threshold; always DEBUG
    pub fn threshold(&self) -> Level {
        Level::Debug
    }

    /// Emitters never hand records to an ancestor
    pub fn propagates(&self) -> bool {
        false
    }

    /// Snapshot of the attached handlers, in attachment order
    pub fn handlers(&self) -> Vec<HandlerInfo> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(Handler::info)
            .collect()
    }

    /// How many times the manager has rebuilt this emitter's handlers
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Whether any attached handler would write a line at `level`
    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|h| h.accepts(level))
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        let line = Location::caller().line();
        self.emit(level, line, &message.to_string());
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Level::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Level::Critical, message);
    }

    /// Hand one line to every attached handler
    pub(crate) fn emit(&self, level: Level, line: u32, message: &str) {
        let record = Record::new(&self.name, level, line, message);
        for handler in self.handlers.read().unwrap_or_else(PoisonError::into_inner).iter() {
            handler.handle(&record);
        }
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("name", &self.name)
            .field("rebuilds", &self.rebuild_count())
            .finish()
    }
}
