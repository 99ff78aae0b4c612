//! Configuration file support for pagemark.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/pagemark/config.toml`. Settings include gesture thresholds,
//! drawing defaults, stroke probing and commit behavior.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

pub use types::{CommitConfig, DrawingConfig, InteractionConfig, ProbeConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [interaction]
/// line_min_length_px = 10.0
/// drag_select_threshold_px = 10.0
///
/// [drawing]
/// default_color = "red"
/// default_font_size = 16.0
///
/// [probe]
/// hit_tolerance = 4.0
///
/// [commit]
/// delete_confirm_title = "Delete this annotation?"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Gesture thresholds and preview behavior
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Defaults for new shapes (color, font size, stroke width)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Stroke hit-testing
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Store interaction
    #[serde(default)]
    pub commit: CommitConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `line_min_length_px`: 1.0 - 100.0
    /// - `drag_select_threshold_px`: 1.0 - 100.0
    /// - `text_min_height_factor`, `text_min_width_factor`: 1.0 - 20.0
    /// - `default_font_size`: 8.0 - 72.0
    /// - `stroke_width`: 0.5 - 20.0
    /// - `hit_tolerance`: 0.5 - 50.0
    pub fn validate_and_clamp(&mut self) {
        clamp_setting(
            "line_min_length_px",
            &mut self.interaction.line_min_length_px,
            1.0,
            100.0,
        );
        clamp_setting(
            "drag_select_threshold_px",
            &mut self.interaction.drag_select_threshold_px,
            1.0,
            100.0,
        );
        clamp_setting(
            "text_min_height_factor",
            &mut self.interaction.text_min_height_factor,
            1.0,
            20.0,
        );
        clamp_setting(
            "text_min_width_factor",
            &mut self.interaction.text_min_width_factor,
            1.0,
            20.0,
        );
        clamp_setting(
            "default_font_size",
            &mut self.drawing.default_font_size,
            8.0,
            72.0,
        );
        clamp_setting("stroke_width", &mut self.drawing.stroke_width, 0.5, 20.0);
        clamp_setting("hit_tolerance", &mut self.probe.hit_tolerance, 0.5, 50.0);

        if self.commit.delete_confirm_title.trim().is_empty() {
            log::warn!("Empty delete_confirm_title, falling back to default");
            self.commit.delete_confirm_title = CommitConfig::default().delete_confirm_title;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/pagemark/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("pagemark");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined, or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the bundled `config.example.toml` to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path or
    /// the file cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

fn clamp_setting(name: &str, value: &mut f64, min: f64, max: f64) {
    if !value.is_finite() {
        log::warn!("Invalid {} {}, falling back to {:.1}", name, value, min);
        *value = min;
    } else if !(min..=max).contains(value) {
        log::warn!(
            "Invalid {} {:.1}, clamping to {:.1}-{:.1} range",
            name,
            value,
            min,
            max
        );
        *value = value.clamp(min, max);
    }
}
