use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File name looked up next to the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.toml";

/// Multisample counts a surface may request.
pub const SUPPORTED_SAMPLE_COUNTS: [u32; 5] = [1, 2, 4, 8, 16];

/// Errors raised while reading the configuration source.
///
/// All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Immutable startup snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// Initial surface width in physical pixels.
    pub width: u32,
    /// Initial surface height in physical pixels.
    pub height: u32,
    /// Multisample count for the color and depth targets.
    pub sample_count: u32,
    pub fullscreen: bool,
    pub borderless: bool,
    pub vsync: bool,
    /// Whether the process console window stays visible.
    pub show_console: bool,
    pub title: String,
    /// Target loop rate in Hz. `0` disables pacing.
    pub update_rate: f64,
    /// Optional window icon. Load failures are advisory.
    pub icon: Option<PathBuf>,
    /// Optional `env_logger` filter string.
    pub log_filter: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            sample_count: 1,
            fullscreen: false,
            borderless: false,
            vsync: true,
            show_console: true,
            title: "lathe".to_string(),
            update_rate: 60.0,
            icon: None,
            log_filter: None,
        }
    }
}

impl Configuration {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        log::info!(
            "loaded configuration from {}: {}x{} samples={} vsync={}",
            path.display(),
            config.width,
            config.height,
            config.sample_count,
            config.vsync
        );
        Ok(config)
    }

    /// Parses a configuration from TOML text without touching the filesystem.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges. Format validation is the parser's job.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        if !SUPPORTED_SAMPLE_COUNTS.contains(&self.sample_count) {
            return Err(ConfigError::Invalid(format!(
                "sample_count must be one of {SUPPORTED_SAMPLE_COUNTS:?}, got {}",
                self.sample_count
            )));
        }

        if !self.update_rate.is_finite() || self.update_rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "update_rate must be a finite non-negative number, got {}",
                self.update_rate
            )));
        }

        Ok(())
    }
}
