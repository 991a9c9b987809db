//! Configuration file support for annotate_osd.
//!
//! This module provides serialization and deserialization of annotator
//! settings, allowing hosts to export and import their configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use annotate_canvas::Style;

use crate::constants::{
    guide, DEFAULT_DOT_RADIUS, DEFAULT_HOME_MARGIN, DEFAULT_MIN_ROUND_RADIUS,
    DEFAULT_RESIZE_DEBOUNCE_MS, DEFAULT_STROKE_WIDTH, DEFAULT_ZOOM_DEBOUNCE_MS,
};

/// Log level setting for the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
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

/// Annotator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Marker stroke width in screen pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    /// Polygon vertex dot radius in screen pixels
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f64,

    /// Margin around a marker framed as home, in image pixels
    #[serde(default = "default_home_margin")]
    pub home_margin: f64,

    /// Smallest circle preview radius in screen pixels
    #[serde(default = "default_min_round_radius")]
    pub min_round_radius: f64,

    /// Quiet time before a zoom burst is handled
    #[serde(default = "default_zoom_debounce_ms")]
    pub zoom_debounce_ms: u64,

    /// Quiet time before a resize burst is handled
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,

    /// Style of the translucent polygon shown while collecting vertices
    #[serde(default = "default_guide_style")]
    pub guide_style: Style,

    /// Log verbosity the host should install
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_dot_radius() -> f64 {
    DEFAULT_DOT_RADIUS
}

fn default_home_margin() -> f64 {
    DEFAULT_HOME_MARGIN
}

fn default_min_round_radius() -> f64 {
    DEFAULT_MIN_ROUND_RADIUS
}

fn default_zoom_debounce_ms() -> u64 {
    DEFAULT_ZOOM_DEBOUNCE_MS
}

fn default_resize_debounce_ms() -> u64 {
    DEFAULT_RESIZE_DEBOUNCE_MS
}

fn default_guide_style() -> Style {
    Style::new(guide::FILL, guide::STROKE, guide::STROKE, guide::OPACITY)
}

impl AnnotatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            stroke_width: default_stroke_width(),
            dot_radius: default_dot_radius(),
            home_margin: default_home_margin(),
            min_round_radius: default_min_round_radius(),
            zoom_debounce_ms: default_zoom_debounce_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            guide_style: default_guide_style(),
            log_level: LogLevel::default(),
        }
    }

    /// Set the stroke width and dot radius (screen pixels).
    pub fn with_sizes(mut self, stroke_width: f64, dot_radius: f64) -> Self {
        self.stroke_width = stroke_width;
        self.dot_radius = dot_radius;
        self
    }

    pub fn zoom_debounce(&self) -> Duration {
        Duration::from_millis(self.zoom_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
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

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "annotate-osd.json"
    }

    /// Load configuration from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AnnotatorConfig {
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

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
