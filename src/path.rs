//! Default log file location
//!
//! Without an explicit path the log file sits next to the program that is
//! running: `/x/y/app` (or `/x/y/app.py`) logs to `/x/y/app.log`.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const FALLBACK_FILE_NAME: &str = "application.log";

/// Resolve the log file path from its possible sources, in priority order
pub fn resolve_log_file_path(
    explicit: Option<&Path>,
    entry_point: Option<&Path>,
    first_arg: Option<&Path>,
    cwd: &Path,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(log) = entry_point.and_then(sibling_log_file) {
        return log;
    }

    if let Some(log) = first_arg.and_then(sibling_log_file) {
        return log;
    }

    cwd.join(FALLBACK_FILE_NAME)
}

/// Resolve using the running process: its executable, argv[0] and working directory.
/// argv[0] and the working directory are only consulted when the executable gives no answer.
pub fn default_log_file_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let entry_point = env::current_exe().ok();
    if let Some(log) = entry_point.as_deref().and_then(sibling_log_file) {
        return log;
    }

    let first_arg = env::args_os().next().map(PathBuf::from);
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_log_file_path(None, None, first_arg.as_deref(), &cwd)
}

/// `<dir>/<stem>.log` for a program path, if it names a file
fn sibling_log_file(program: &Path) -> Option<PathBuf> {
    let stem = program.file_stem()?;
    if stem.is_empty() {
        return None;
    }
    let mut name = OsString::from(stem);
    name.push(".log");
    let dir = program.parent().unwrap_or_else(|| Path::new(""));
    Some(dir.join(name))
}
