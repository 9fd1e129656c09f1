//! Feige configuration
//!
//! Process-wide defaults for timers, locks and logging, read from TOML.
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. Explicit config file (--config)
//! 3. User-level (~/.config/feige/config.toml)
//! 4. Default values
//! ```
//!
//! # Example
//!
//! ```toml
//! [timer]
//! repeats = false
//! queue = "global"
//! qos = "user-initiated"
//!
//! [lock]
//! qos = "utility"
//!
//! [log]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dispatch::{Qos, Queue};
use crate::util::logger::LogLevel;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeigeConfig {
    /// Timer defaults
    #[serde(default)]
    pub timer: TimerConfig,
    /// Lock defaults
    #[serde(default)]
    pub lock: LockConfig,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Which queue timer callbacks run on by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    /// The process-wide serial queue
    #[default]
    Main,
    /// The global concurrent queue of `TimerConfig::qos`
    Global,
}

/// Timer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Whether timers repeat unless told otherwise
    #[serde(default)]
    pub repeats: bool,
    /// Default callback queue
    #[serde(default)]
    pub queue: QueueKind,
    /// QoS used when `queue = "global"`
    #[serde(default)]
    pub qos: Qos,
}

impl TimerConfig {
    /// Resolve the configured queue.
    pub fn queue(&self) -> Queue {
        match self.queue {
            QueueKind::Main => Queue::main(),
            QueueKind::Global => Queue::global(self.qos),
        }
    }
}

/// Lock configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    /// QoS of the global queue mutations drain on
    #[serde(default = "default_lock_qos")]
    pub qos: Qos,
}

fn default_lock_qos() -> Qos {
    Qos::Utility
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            qos: default_lock_qos(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level
    #[serde(default)]
    pub level: LogLevel,
}

impl FeigeConfig {
    /// Install the timer and lock defaults process-wide.
    pub fn apply(&self) {
        crate::timer::set_defaults(crate::timer::TimerDefaults {
            repeats: self.timer.repeats,
            queue: self.timer.queue(),
        });
        crate::sync::set_default_qos(self.lock.qos);
        tracing::debug!(
            repeats = self.timer.repeats,
            timer_queue = ?self.timer.queue,
            lock_qos = %self.lock.qos,
            "applied configuration"
        );
    }
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    // Try XDG config directory on Unix
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("feige"));
    }

    // Fallback to ~/.config/feige
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("feige"));
    }

    // On Windows, try %APPDATA%
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("feige"));
    }

    None
}

/// Get the user config file path (~/.config/feige/config.toml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load user-level configuration
/// Returns default config if file doesn't exist
pub fn load_user_config() -> Result<FeigeConfig, ConfigError> {
    match get_config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(FeigeConfig::default()),
    }
}

/// Load configuration from an explicit file
pub fn load_config_from(path: &Path) -> Result<FeigeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<FeigeConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Save configuration to an explicit file, creating parent directories
pub fn save_config_to(
    config: &FeigeConfig,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;

    Ok(())
}

/// Save user-level configuration
pub fn save_user_config(config: &FeigeConfig) -> Result<(), ConfigError> {
    let path = get_config_path().ok_or(ConfigError::NoConfigDir)?;
    save_config_to(config, &path)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Cannot determine config directory")]
    NoConfigDir,
}
