//! Configuration file support for hviz.
//!
//! Settings are stored as versioned JSON. Every section has defaults, so a
//! file only needs the values it wants to change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DETECTION_DELAY_MS, DEFAULT_MAX_DISPLAY_HEIGHT, DEFAULT_MAX_DISPLAY_WIDTH,
};
use crate::interaction::HitPriority;
use crate::render::{OverlayStyle, StyleError};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    #[default]
    Info,
    Debug,
    /// Show all log messages including per-frame trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub preferences: UserPreferences,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// Overlay colors, alphas and stroke widths
    #[serde(default)]
    pub style: OverlayStyle,
}

fn default_app_name() -> String {
    "hviz".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Display surface bounds and hit-test rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub hit_priority: HitPriority,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DISPLAY_WIDTH,
            max_height: DEFAULT_MAX_DISPLAY_HEIGHT,
            hit_priority: HitPriority::default(),
        }
    }
}

/// Detection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Simulated detection time of the mock segmenter
    pub detection_delay_ms: u64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            detection_delay_ms: DEFAULT_DETECTION_DELAY_MS,
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            display: DisplayConfig::default(),
            acquisition: AcquisitionConfig::default(),
            style: OverlayStyle::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        config.style.validate()?;
        if config.display.max_width == 0 || config.display.max_height == 0 {
            return Err(ConfigError::InvalidDisplay {
                width: config.display.max_width,
                height: config.display.max_height,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "hviz-config.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("hviz").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("hviz")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_path(&path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Overlay style breaks the emphasis ordering
    #[error("Invalid overlay style: {0}")]
    InvalidStyle(#[from] StyleError),

    #[error("Display bounds must be non-zero, got {width}x{height}")]
    InvalidDisplay { width: u32, height: u32 },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.display.max_width, 800);
        assert_eq!(config.display.max_height, 600);
        assert_eq!(config.display.hit_priority, HitPriority::FirstInDrawOrder);
        assert_eq!(config.acquisition.detection_delay_ms, 2000);
        assert_eq!(config.preferences.log_level, LogLevel::Info);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = AppConfig::new();
        config.display.hit_priority = HitPriority::TopmostDrawn;
        config.preferences.log_level = LogLevel::Debug;

        let json = config.to_json().unwrap();
        assert!(json.contains("\"topmost_drawn\""));
        assert_eq!(AppConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_minimal_file_takes_defaults() {
        let config = AppConfig::from_json(r#"{"version": 1, "display": {"max_width": 1024}}"#).unwrap();
        assert_eq!(config.app_name, "hviz");
        assert_eq!(config.display.max_width, 1024);
        assert_eq!(config.display.max_height, 600);
        assert_eq!(config.style, OverlayStyle::default());
    }

    #[test]
    fn test_version_too_new() {
        let json = format!(r#"{{"version": {}}}"#, CONFIG_VERSION + 1);
        assert!(matches!(
            AppConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_invalid_style_rejected() {
        let mut config = AppConfig::new();
        config.style.hovered.fill_alpha = 0xFF;
        let json = config.to_json().unwrap();
        assert!(matches!(
            AppConfig::from_json(&json),
            Err(ConfigError::InvalidStyle(StyleError::AlphaOrdering { .. }))
        ));
    }

    #[test]
    fn test_zero_display_rejected() {
        let json = r#"{"version": 1, "display": {"max_height": 0}}"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(ConfigError::InvalidDisplay { .. })
        ));
    }

    #[test]
    fn test_save_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(AppConfig::default_filename());

        let mut config = AppConfig::new();
        config.acquisition.detection_delay_ms = 0;
        config.save_to_path(&path).unwrap();

        assert_eq!(AppConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
