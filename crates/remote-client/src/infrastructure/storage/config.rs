//! TOML configuration file for the remote client.
//!
//! Default location:
//! - Linux:    `$XDG_CONFIG_HOME/web-remote/config.toml` (or `~/.config/web-remote/`)
//! - Windows:  `%APPDATA%\WebRemote\config.toml`
//! - macOS:    `~/Library/Application Support/WebRemote/config.toml`
//!
//! Every table and every field is optional:
//!
//! ```toml
//! [client]
//! endpoint = "ws://192.168.1.20:8080/remote"
//! log_level = "debug"
//!
//! [timing]
//! flush_ms = 20
//! poll_ms = 90
//! tap_window_ms = 180
//!
//! [motion]
//! history_len = 2
//! movement_multiplier = 1.5
//! strategy = "normalized"
//! target_pixels_per_second = 325.0
//!
//! [text]
//! pad_len = 15
//! ```
//!
//! Absent fields take the defaults below, so an empty file (or no file at
//! all) yields [`ClientConfig::default`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use remote_core::domain::motion::MotionStrategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ClientConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but cannot be used.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// On-disk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub timing: TimingSection,
    #[serde(default)]
    pub motion: MotionSection,
    #[serde(default)]
    pub text: TextSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSection {
    /// Host WebSocket URL.  Omitted until the user sets one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingSection {
    #[serde(default = "default_flush_ms")]
    pub flush_ms: u64,
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
    #[serde(default = "default_tap_window_ms")]
    pub tap_window_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotionSection {
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    #[serde(default = "default_multiplier")]
    pub movement_multiplier: f64,
    #[serde(default)]
    pub strategy: MotionStrategy,
    #[serde(default = "default_target_pps")]
    pub target_pixels_per_second: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextSection {
    #[serde(default = "default_pad_len")]
    pub pad_len: usize,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_flush_ms() -> u64 {
    20
}
fn default_poll_ms() -> u64 {
    90
}
fn default_tap_window_ms() -> u64 {
    180
}
fn default_history_len() -> usize {
    2
}
fn default_multiplier() -> f64 {
    1.0
}
fn default_target_pps() -> f64 {
    325.0
}
fn default_pad_len() -> usize {
    15
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            endpoint: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            flush_ms: default_flush_ms(),
            poll_ms: default_poll_ms(),
            tap_window_ms: default_tap_window_ms(),
        }
    }
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            history_len: default_history_len(),
            movement_multiplier: default_multiplier(),
            strategy: MotionStrategy::default(),
            target_pixels_per_second: default_target_pps(),
        }
    }
}

impl Default for TextSection {
    fn default() -> Self {
        Self {
            pad_len: default_pad_len(),
        }
    }
}

impl FileConfig {
    /// Converts the file contents into runtime settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero timer period or a
    /// non-finite motion factor.
    pub fn into_client_config(self) -> Result<ClientConfig, ConfigError> {
        if self.timing.flush_ms == 0 || self.timing.poll_ms == 0 {
            return Err(ConfigError::Invalid(
                "timer periods must be at least 1 ms".to_string(),
            ));
        }
        if !self.motion.movement_multiplier.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "movement_multiplier must be finite, got {}",
                self.motion.movement_multiplier
            )));
        }
        if !(self.motion.target_pixels_per_second.is_finite()
            && self.motion.target_pixels_per_second > 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "target_pixels_per_second must be positive, got {}",
                self.motion.target_pixels_per_second
            )));
        }

        Ok(ClientConfig {
            endpoint: self.client.endpoint,
            flush_period: Duration::from_millis(self.timing.flush_ms),
            poll_period: Duration::from_millis(self.timing.poll_ms),
            tap_window: Duration::from_millis(self.timing.tap_window_ms),
            history_len: self.motion.history_len,
            pad_len: self.text.pad_len,
            movement_multiplier: self.motion.movement_multiplier,
            motion_strategy: self.motion.strategy,
            target_pixels_per_second: self.motion.target_pixels_per_second,
        })
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from `path`, or from the default location when `path` is
/// `None`.  A missing file yields [`FileConfig::default`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Writes `config` to `path` (or the default location), creating the parent
/// directory if needed.  Returns the path written.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &FileConfig, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// The platform config directory for this application.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("WebRemote"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("web-remote"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("WebRemote")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("web_remote_test_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_default_file_config_matches_client_defaults() {
        // Arrange / Act
        let cfg = FileConfig::default().into_client_config().unwrap();

        // Assert
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: FileConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, FileConfig::default());
        assert_eq!(cfg.client.log_level, "info");
    }

    #[test]
    fn test_partial_tables_override_only_given_fields() {
        // Arrange
        let toml_str = r#"
[client]
endpoint = "ws://10.0.0.2:8080/remote"

[timing]
flush_ms = 5

[motion]
strategy = "normalized"
"#;

        // Act
        let cfg = toml::from_str::<FileConfig>(toml_str)
            .expect("deserialize partial")
            .into_client_config()
            .unwrap();

        // Assert
        assert_eq!(cfg.endpoint.as_deref(), Some("ws://10.0.0.2:8080/remote"));
        assert_eq!(cfg.flush_period, Duration::from_millis(5));
        assert_eq!(cfg.poll_period, Duration::from_millis(90));
        assert_eq!(cfg.motion_strategy, MotionStrategy::Normalized);
    }

    #[test]
    fn test_unknown_strategy_is_a_parse_error() {
        let result: Result<FileConfig, _> = toml::from_str("[motion]\nstrategy = \"warp\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_flush_period_is_rejected() {
        let mut file = FileConfig::default();
        file.timing.flush_ms = 0;

        let result = file.into_client_config();

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_finite_multiplier_is_rejected() {
        let mut file = FileConfig::default();
        file.motion.movement_multiplier = f64::NAN;

        assert!(matches!(
            file.into_client_config(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        // Arrange
        let path = temp_dir().join("config.toml");

        // Act
        let cfg = load_config(Some(&path)).unwrap();

        // Assert
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("nested").join("config.toml");
        let mut cfg = FileConfig::default();
        cfg.client.endpoint = Some("ws://host/remote".to_string());
        cfg.text.pad_len = 8;

        // Act
        let written = save_config(&cfg, Some(&path)).unwrap();
        let loaded = load_config(Some(&written)).unwrap();

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_reports_parse_error() {
        // Arrange
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        // Act
        let result = load_config(Some(&path));

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(path.ends_with("config.toml"), "got {path:?}");
        }
    }
}
