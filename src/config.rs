//! Startup settings
//!
//! Settings come from a YAML file found through a fallback chain
//! (`--config`, `LOGMANAGER_CONFIG`, the user config dir, `./logmanager.yaml`),
//! with `LOGMANAGER_LEVEL` overriding the level. Fallback files that fail to
//! load are skipped and reported back to the caller, since the manager that
//! would log the failure is usually not configured yet.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::manager::{LevelChange, LogManager};
use crate::rotating::{DEFAULT_BACKUP_COUNT, DEFAULT_MAX_BYTES, RotationPolicy};

pub const CONFIG_ENV: &str = "LOGMANAGER_CONFIG";
pub const LEVEL_ENV: &str = "LOGMANAGER_LEVEL";
const CONFIG_FILE_NAME: &str = "logmanager.yaml";

/// Startup settings for a [`LogManager`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Level name; unknown names mean INFO
    pub level: String,
    pub file_logging: FileLoggingSettings,
    /// Explicit log file; `~` and env vars are expanded
    pub file_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileLoggingSettings {
    pub enabled: bool,
    pub rotate: bool,
    pub max_bytes: u64,
    pub backup_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file_logging: FileLoggingSettings::default(),
            file_path: None,
        }
    }
}

impl Default for FileLoggingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            rotate: true,
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
        }
    }
}

impl FileLoggingSettings {
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy {
            max_bytes: self.max_bytes,
            backup_count: self.backup_count,
        }
    }
}

/// A fallback settings file that exists but could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub error: String,
}

/// Result of settings discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// File the settings came from; `None` means defaults
    pub source: Option<PathBuf>,
    pub skipped: Vec<SkippedSource>,
}

impl Settings {
    /// Load settings with fallback chain, then apply the level env override
    pub fn load(config_path: Option<&PathBuf>) -> Result<LoadedSettings> {
        let mut loaded = Self::discover(config_path)?;
        if let Ok(level) = std::env::var(LEVEL_ENV) {
            loaded.settings.level = level;
        }
        Ok(loaded)
    }

    fn discover(config_path: Option<&PathBuf>) -> Result<LoadedSettings> {
        // An explicit path must load
        if let Some(path) = config_path {
            let settings =
                Self::load_from_file(path).context(format!("Failed to load settings from {}", path.display()))?;
            return Ok(LoadedSettings {
                settings,
                source: Some(path.clone()),
                skipped: Vec::new(),
            });
        }

        Ok(Self::load_first(Self::candidate_paths()))
    }

    /// Fallback locations, highest priority first
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            candidates.push(PathBuf::from(env_path));
        }
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("logmanager").join(CONFIG_FILE_NAME));
        }
        candidates.push(PathBuf::from(CONFIG_FILE_NAME));
        candidates
    }

    /// Load the first candidate that exists and parses; missing files are
    /// passed over silently, broken ones are recorded in `skipped`
    pub fn load_first(candidates: Vec<PathBuf>) -> LoadedSettings {
        let mut skipped = Vec::new();

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(settings) => {
                    return LoadedSettings {
                        settings,
                        source: Some(path),
                        skipped,
                    };
                }
                Err(e) => skipped.push(SkippedSource {
                    path,
                    error: format!("{:#}", e),
                }),
            }
        }

        LoadedSettings {
            settings: Self::default(),
            source: None,
            skipped,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read settings file")?;
        let settings: Self = serde_yaml::from_str(&content).context("Failed to parse settings file")?;
        Ok(settings)
    }

    /// Explicit file path with `~` and env vars expanded
    pub fn expanded_file_path(&self) -> Option<PathBuf> {
        self.file_path.as_deref().map(expand_path)
    }

    /// Push these settings into an existing manager; returns the level change report
    pub fn apply(&self, manager: &LogManager) -> Result<LevelChange> {
        manager.set_rotation_policy(self.file_logging.rotation_policy())?;
        if let Some(path) = self.expanded_file_path() {
            manager.set_file_path(path)?;
        }
        if self.file_logging.enabled {
            manager
                .enable_file_logging(self.file_logging.rotate)
                .context("Failed to enable file logging")?;
        }
        Ok(manager.configure_level(&self.level))
    }
}

impl LogManager {
    /// Manager on the process streams, configured from `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let manager = LogManager::new();
        settings.apply(&manager)?;
        Ok(manager)
    }
}

/// Expand a path that may contain ~ or env vars
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
    PathBuf::from(expanded.as_ref())
}
