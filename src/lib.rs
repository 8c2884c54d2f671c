//! # logmanager
//!
//! Named, colorized log emitters that share one runtime configuration.
//!
//! Every emitter writes DEBUG/INFO lines to stdout and WARNING and above to
//! stderr, plus every level to an optional (rotating) log file. Changing the
//! level, toggling file output or moving the file rewires all emitters at once.
//!
//! ```rust,no_run
//! use logmanager::LogManager;
//!
//! let manager = LogManager::new();
//! manager.enable_file_logging(true)?;
//! manager.configure_level("DEBUG");
//!
//! let log = manager.emitter("app");
//! log.debug("starting");
//! log.warning("disk almost full");
//! # Ok::<(), eyre::Report>(())
//! ```

pub mod bridge;
pub mod config;
pub mod emitter;
pub mod format;
pub mod handler;
pub mod hex;
pub mod level;
pub mod manager;
pub mod path;
pub mod rotating;
pub mod sink;

pub use bridge::{global, install, install_global};
pub use config::{FileLoggingSettings, LoadedSettings, Settings, SkippedSource};
pub use emitter::Emitter;
pub use handler::{HandlerInfo, HandlerTarget};
pub use hex::hexstr;
pub use level::{Level, LevelRange};
pub use manager::{FileLogging, LevelChange, LogManager};
pub use rotating::RotationPolicy;
pub use sink::{BufferSink, ConsoleSink, StdioSink, Stream};
