//! Emitter registry and reconfiguration
//!
//! The manager owns the global settings (level, file logging, file path,
//! rotation) and every emitter it has handed out. Each change to the settings
//! rebuilds the handlers of every registered emitter while the state lock is
//! held, so no emitter is ever observed wired to an older configuration.

use eyre::Result;
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::emitter::Emitter;
use crate::handler::{Handler, SharedFile};
use crate::level::Level;
use crate::path::default_log_file_path;
use crate::rotating::{RotatingFile, RotationPolicy};
use crate::sink::{ConsoleSink, StdioSink};

const NO_CHANGES: &str = "No changes made to logger levels";

/// Whether a file handler is attached, and whether it rotates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileLogging {
    #[default]
    Disabled,
    Enabled {
        rotate: bool,
    },
}

/// Outcome of [`LogManager::configure_level`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelChange {
    /// Nothing was rebuilt
    Unchanged,
    /// One description per rebuilt emitter, in registration order
    Changed(Vec<String>),
}

impl LevelChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, LevelChange::Changed(_))
    }

    pub fn descriptions(&self) -> &[String] {
        match self {
            LevelChange::Unchanged => &[],
            LevelChange::Changed(descriptions) => descriptions,
        }
    }
}

impl fmt::Display for LevelChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelChange::Unchanged => f.write_str(NO_CHANGES),
            LevelChange::Changed(descriptions) => f.write_str(&descriptions.join("\n")),
        }
    }
}

struct State {
    level: Level,
    file_logging: FileLogging,
    file_path: Option<PathBuf>,
    rotation: RotationPolicy,
    file: Option<SharedFile>,
    registry: IndexMap<String, Arc<Emitter>>,
}

impl State {
    fn log_file_path(&self) -> PathBuf {
        default_log_file_path(self.file_path.as_deref())
    }

    fn open_file(&self, path: &Path, rotate: bool) -> Result<SharedFile> {
        let policy = rotate.then_some(self.rotation);
        let file = RotatingFile::open(path, policy)?;
        Ok(Arc::new(Mutex::new(file)))
    }

    fn handlers(&self, console: &Arc<dyn ConsoleSink>) -> Vec<Handler> {
        let mut handlers = vec![Handler::stdout(self.level, console.clone()), Handler::stderr(console.clone())];

        if let (FileLogging::Enabled { .. }, Some(file)) = (self.file_logging, &self.file) {
            handlers.push(Handler::file(file.clone()));
        }

        handlers
    }

    fn rebuild_all(&self, console: &Arc<dyn ConsoleSink>) {
        for emitter in self.registry.values() {
            emitter.replace_handlers(self.handlers(console));
        }
    }
}

/// Registry of named emitters sharing one configuration
pub struct LogManager {
    state: Mutex<State>,
    console: Arc<dyn ConsoleSink>,
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LogManager {
    /// Manager writing to the process stdout/stderr, level INFO, no file
    pub fn new() -> Self {
        Self::with_console(Arc::new(StdioSink))
    }

    /// Manager whose console handlers write to `console`
    pub fn with_console(console: Arc<dyn ConsoleSink>) -> Self {
        Self {
            state: Mutex::new(State {
                level: Level::default(),
                file_logging: FileLogging::Disabled,
                file_path: None,
                rotation: RotationPolicy::default(),
                file: None,
                registry: IndexMap::new(),
            }),
            console,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the emitter called `name`, creating and wiring it on first use
    pub fn emitter(&self, name: &str) -> Arc<Emitter> {
        let mut state = self.lock();
        if let Some(emitter) = state.registry.get(name) {
            return emitter.clone();
        }

        let emitter = Arc::new(Emitter::new(name, state.handlers(&self.console)));
        state.registry.insert(name.to_string(), emitter.clone());
        emitter
    }

    /// Set the level by name (case-insensitive, unknown names mean INFO) and
    /// rebuild every emitter. Setting the current level again rebuilds nothing.
    pub fn configure_level(&self, level: &str) -> LevelChange {
        let new_level = Level::from_name(level);

        let mut state = self.lock();
        let old_level = state.level;
        if old_level == new_level {
            return LevelChange::Unchanged;
        }

        state.level = new_level;
        state.rebuild_all(&self.console);
        let descriptions: Vec<String> = state
            .registry
            .keys()
            .map(|name| format!("Logger '{}' level changed from {} to {}", name, old_level, new_level))
            .collect();

        if descriptions.is_empty() {
            LevelChange::Unchanged
        } else {
            LevelChange::Changed(descriptions)
        }
    }

    /// Attach a file handler to every emitter. With `rotate` the file is capped
    /// by the rotation policy. If the file cannot be opened nothing changes.
    pub fn enable_file_logging(&self, rotate: bool) -> Result<()> {
        let mut state = self.lock();
        let path = state.log_file_path();
        let file = state.open_file(&path, rotate)?;

        state.file_logging = FileLogging::Enabled { rotate };
        state.file = Some(file);
        state.rebuild_all(&self.console);
        Ok(())
    }

    /// Detach the file handler from every emitter
    pub fn disable_file_logging(&self) {
        let mut state = self.lock();
        state.file_logging = FileLogging::Disabled;
        state.file = None;
        state.rebuild_all(&self.console);
    }

    /// Point file output at `path`. Takes effect immediately when file
    /// logging is on; if the new file cannot be opened nothing changes.
    pub fn set_file_path(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let mut state = self.lock();

        if let FileLogging::Enabled { rotate } = state.file_logging {
            let file = state.open_file(&path, rotate)?;
            state.file = Some(file);
        }

        state.file_path = Some(path);
        state.rebuild_all(&self.console);
        Ok(())
    }

    /// Change the size cap and backup count used by rotating file output
    pub fn set_rotation_policy(&self, policy: RotationPolicy) -> Result<()> {
        let mut state = self.lock();
        let previous = state.rotation;
        state.rotation = policy;

        if let FileLogging::Enabled { rotate: true } = state.file_logging {
            let path = state.log_file_path();
            match state.open_file(&path, true) {
                Ok(file) => state.file = Some(file),
                Err(e) => {
                    state.rotation = previous;
                    return Err(e);
                }
            }
        }

        state.rebuild_all(&self.console);
        Ok(())
    }

    pub fn level(&self) -> Level {
        self.lock().level
    }

    pub fn level_name(&self) -> &'static str {
        self.level().name()
    }

    pub fn file_logging(&self) -> FileLogging {
        self.lock().file_logging
    }

    pub fn is_file_logging_enabled(&self) -> bool {
        matches!(self.file_logging(), FileLogging::Enabled { .. })
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        self.lock().rotation
    }

    /// Where file output goes (or would go once enabled)
    pub fn log_file_path(&self) -> PathBuf {
        self.lock().log_file_path()
    }

    /// Registered emitter names, oldest first
    pub fn emitter_names(&self) -> Vec<String> {
        self.lock().registry.keys().cloned().collect()
    }
}

impl fmt::Debug for LogManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("LogManager")
            .field("level", &state.level)
            .field("file_logging", &state.file_logging)
            .field("file_path", &state.file_path)
            .field("emitters", &state.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerTarget;
    use crate::level::LevelRange;
    use crate::sink::BufferSink;
    use tempfile::TempDir;

    fn manager() -> (LogManager, Arc<BufferSink>) {
        let sink = Arc::new(BufferSink::new());
        (LogManager::with_console(sink.clone()), sink)
    }

    fn handler_ids(emitter: &Emitter) -> Vec<u64> {
        emitter.handlers().iter().map(|h| h.id).collect()
    }

    #[test]
    fn test_defaults() {
        let (manager, _) = manager();
        assert_eq!(manager.level(), Level::Info);
        assert_eq!(manager.level_name(), "INFO");
        assert!(!manager.is_file_logging_enabled());
        assert_eq!(manager.rotation_policy(), RotationPolicy::default());
        assert!(manager.emitter_names().is_empty());
    }

    #[test]
    fn test_emitter_identity() {
        let (manager, _) = manager();
        let a = manager.emitter("a");
        let b = manager.emitter("b");
        let a_again = manager.emitter("a");

        assert!(Arc::ptr_eq(&a, &a_again));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a_again.rebuild_count(), 0);
        assert_eq!(manager.emitter_names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_empty_name_is_accepted() {
        let (manager, _) = manager();
        let emitter = manager.emitter("");
        assert_eq!(emitter.name(), "");
    }

    #[test]
    fn test_new_emitter_wiring() {
        let (manager, _) = manager();
        let emitter = manager.emitter("mod1");
        let handlers = emitter.handlers();

        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].target, HandlerTarget::Stdout);
        assert_eq!(handlers[0].levels, LevelRange::new(Level::Info, Level::Info));
        assert_eq!(handlers[1].target, HandlerTarget::Stderr);
        assert_eq!(handlers[1].levels, LevelRange::new(Level::Warning, Level::Critical));
        assert_eq!(emitter.threshold(), Level::Debug);
        assert!(!emitter.propagates());
    }

    #[test]
    fn test_configure_level_rebuilds_all() {
        let (manager, _) = manager();
        let a = manager.emitter("a");
        let b = manager.emitter("b");
        let before = handler_ids(&a);

        let change = manager.configure_level("debug");

        assert_eq!(
            change,
            LevelChange::Changed(vec![
                "Logger 'a' level changed from INFO to DEBUG".to_string(),
                "Logger 'b' level changed from INFO to DEBUG".to_string(),
            ])
        );
        assert_eq!(manager.level(), Level::Debug);
        assert_eq!(a.rebuild_count(), 1);
        assert_eq!(b.rebuild_count(), 1);
        assert!(handler_ids(&a).iter().all(|id| !before.contains(id)));
        assert!(a.is_enabled_for(Level::Debug));
    }

    #[test]
    fn test_configure_same_level_is_noop() {
        let (manager, _) = manager();
        let emitter = manager.emitter("a");
        manager.configure_level("DEBUG");
        let ids = handler_ids(&emitter);

        let change = manager.configure_level("debug");

        assert_eq!(change, LevelChange::Unchanged);
        assert!(!change.is_changed());
        assert_eq!(change.to_string(), "No changes made to logger levels");
        assert_eq!(emitter.rebuild_count(), 1);
        assert_eq!(handler_ids(&emitter), ids);
    }

    #[test]
    fn test_unknown_level_means_info() {
        let (manager, _) = manager();
        manager.emitter("a");
        manager.configure_level("ERROR");

        let change = manager.configure_level("loud");

        assert_eq!(manager.level(), Level::Info);
        assert!(change.is_changed());
        assert_eq!(change.descriptions(), ["Logger 'a' level changed from ERROR to INFO".to_string()]);
    }

    #[test]
    fn test_configure_level_with_empty_registry() {
        let (manager, _) = manager();
        let change = manager.configure_level("WARNING");

        assert_eq!(change, LevelChange::Unchanged);
        assert_eq!(manager.level(), Level::Warning);

        let emitter = manager.emitter("late");
        assert!(!emitter.is_enabled_for(Level::Info));
        assert!(emitter.is_enabled_for(Level::Warning));
    }

    #[test]
    fn test_file_logging_toggle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let (manager, _) = manager();
        manager.set_file_path(&path).unwrap();
        let a = manager.emitter("a");

        manager.enable_file_logging(true).unwrap();
        let b = manager.emitter("b");

        for emitter in [&a, &b] {
            let files: Vec<_> = emitter.handlers().into_iter().filter(|h| h.is_file()).collect();
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].levels, LevelRange::all());
            assert_eq!(files[0].target, HandlerTarget::File(path.clone()));
            assert!(!files[0].colorized);
        }
        assert_eq!(manager.file_logging(), FileLogging::Enabled { rotate: true });

        manager.disable_file_logging();

        for emitter in [&a, &b] {
            assert!(emitter.handlers().iter().all(|h| !h.is_file()));
        }
        assert!(!manager.is_file_logging_enabled());
    }

    #[test]
    fn test_file_receives_every_level() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let (manager, sink) = manager();
        manager.set_file_path(&path).unwrap();
        manager.enable_file_logging(false).unwrap();

        let emitter = manager.emitter("mod1");
        emitter.debug("debug line");
        emitter.critical("critical line");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(" - mod1 - "));
        assert!(content.contains("DEBUG - debug line"));
        assert!(content.contains("CRITICAL - critical line"));
        assert!(!content.contains('\u{1b}'));
        assert!(sink.stdout().is_empty());
    }

    #[test]
    fn test_enable_failure_leaves_state() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let (manager, _) = manager();
        manager.set_file_path(blocker.join("app.log")).unwrap();
        let emitter = manager.emitter("a");

        assert!(manager.enable_file_logging(true).is_err());
        assert!(!manager.is_file_logging_enabled());
        assert_eq!(emitter.rebuild_count(), 0);
        assert!(emitter.handlers().iter().all(|h| !h.is_file()));
    }

    #[test]
    fn test_set_file_path_retargets() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");
        let (manager, _) = manager();
        manager.set_file_path(&first).unwrap();
        manager.enable_file_logging(true).unwrap();
        let emitter = manager.emitter("a");

        emitter.info("one");
        manager.set_file_path(&second).unwrap();
        emitter.info("two");

        assert_eq!(manager.log_file_path(), second);
        assert!(std::fs::read_to_string(&first).unwrap().contains("one"));
        let content = std::fs::read_to_string(&second).unwrap();
        assert!(content.contains("two"));
        assert!(!content.contains("one"));
    }

    #[test]
    fn test_set_file_path_without_file_logging() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("later.log");
        let (manager, _) = manager();
        let emitter = manager.emitter("a");

        manager.set_file_path(&path).unwrap();

        assert_eq!(manager.log_file_path(), path);
        assert!(!path.exists());
        assert_eq!(emitter.rebuild_count(), 1);
    }

    #[test]
    fn test_rotation_policy_applies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let (manager, _) = manager();
        manager.set_file_path(&path).unwrap();
        manager.enable_file_logging(true).unwrap();
        manager
            .set_rotation_policy(RotationPolicy {
                max_bytes: 200,
                backup_count: 2,
            })
            .unwrap();

        let emitter = manager.emitter("a");
        for i in 0..50 {
            emitter.info(format!("message number {}", i));
        }

        assert!(crate::rotating::backup_path(&path, 1).exists());
        assert!(crate::rotating::backup_path(&path, 2).exists());
        assert!(!crate::rotating::backup_path(&path, 3).exists());
    }

    #[test]
    fn test_concurrent_lookup_and_reconfigure() {
        let (manager, _) = manager();
        let manager = Arc::new(manager);

        let threads: Vec<_> = (0..8)
            .map(|i| {
                let manager = manager.clone();
                std::thread::spawn(move || {
                    let emitter = manager.emitter(&format!("worker{}", i % 4));
                    manager.configure_level(if i % 2 == 0 { "DEBUG" } else { "ERROR" });
                    emitter.info("tick");
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let level = manager.level();
        assert_eq!(manager.emitter_names().len(), 4);
        for name in manager.emitter_names() {
            let emitter = manager.emitter(&name);
            assert_eq!(emitter.handlers()[0].levels.min, level);
        }
    }
}
