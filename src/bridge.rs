//! `log` facade integration and the process-wide default manager
//!
//! Once a manager is installed, `log::info!` and friends land in the emitter
//! named after the record's target (by default the calling module path).

use eyre::{Context, Result};
use once_cell::sync::Lazy;

use crate::level::Level;
use crate::manager::LogManager;

static GLOBAL: Lazy<LogManager> = Lazy::new(LogManager::new);

/// The default manager shared by the whole process
pub fn global() -> &'static LogManager {
    &GLOBAL
}

/// Route every `log` record through `manager`
pub fn install(manager: &'static LogManager) -> Result<()> {
    log::set_logger(manager).context("Another logger is already installed")?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Install the global manager
pub fn install_global() -> Result<()> {
    install(global())
}

impl log::Log for LogManager {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let emitter = self.emitter(record.target());
        let level = Level::from(record.level());
        if !emitter.is_enabled_for(level) {
            return;
        }
        let message = record.args().to_string();
        emitter.emit(level, record.line().unwrap_or(0), &message);
    }

    fn flush(&self) {}
}
