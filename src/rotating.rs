//! Size-capped log file with numbered backups
//!
//! `app.log` is always the live file. When a write would reach the size cap,
//! `app.log.N` shifts to `app.log.N+1` (the oldest falls off), `app.log` becomes
//! `app.log.1`, and writing continues in a fresh `app.log`.

use eyre::{Context, Result};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_BYTES: u64 = 10_000_000;
pub const DEFAULT_BACKUP_COUNT: usize = 7;

/// When to rotate and how many old files to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub backup_count: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
        }
    }
}

/// Append-only log file, rotated when a policy is set
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    size: u64,
    policy: Option<RotationPolicy>,
}

impl RotatingFile {
    /// Open (or create) the log file for appending.
    /// `policy: None` means the file grows without bound.
    pub fn open(path: impl AsRef<Path>, policy: Option<RotationPolicy>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .context(format!("Failed to create log directory {}", parent.display()))?;
        }

        let file = open_append(&path).context(format!("Failed to open log file {}", path.display()))?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            path,
            file,
            size,
            policy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line, rotating first if it would reach the cap.
    /// The line and its newline go out in a single append.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        let len = buf.len() as u64;

        if let Some(policy) = self.policy
            && policy.max_bytes > 0
            && self.size > 0
            && self.size + len >= policy.max_bytes
        {
            self.rotate(policy)?;
        }

        self.file.write_all(buf.as_bytes())?;
        self.file.flush()?;
        self.size += len;
        Ok(())
    }

    fn rotate(&mut self, policy: RotationPolicy) -> io::Result<()> {
        if policy.backup_count > 0 {
            for index in (1..policy.backup_count).rev() {
                let src = backup_path(&self.path, index);
                if src.exists() {
                    let dst = backup_path(&self.path, index + 1);
                    if dst.exists() {
                        fs::remove_file(&dst)?;
                    }
                    fs::rename(&src, &dst)?;
                }
            }

            let first = backup_path(&self.path, 1);
            if first.exists() {
                fs::remove_file(&first)?;
            }
            fs::rename(&self.path, &first)?;
            self.file = open_append(&self.path)?;
        } else {
            self.file = OpenOptions::new().write(true).truncate(true).create(true).open(&self.path)?;
        }

        self.size = 0;
        Ok(())
    }
}

/// `app.log` + 3 -> `app.log.3`
pub fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
