//! Configuration management for splitflap.
//!
//! Configuration is loaded with figment from defaults, an optional TOML
//! file and `SPLITFLAP_`-prefixed environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::catalog::TITLES_KEY;
use crate::error::{Error, Result};
use crate::rows::LayoutMode;
use crate::sizing::SizingProfile;
use crate::store::StoreBackend;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "splitflap";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "titles.db";

/// Application configuration.
///
/// Sources, highest precedence first:
/// 1. Environment variables (prefixed with `SPLITFLAP_`)
/// 2. TOML config file at `~/.config/splitflap/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where customized titles are kept.
    pub storage: StorageConfig,
    /// Rotation timing.
    pub rotation: RotationConfig,
    /// Row layout.
    pub layout: LayoutConfig,
    /// Overrides for the layout's sizing constants.
    pub sizing: SizingConfig,
    /// Flap animation.
    pub flap: FlapConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend holds the titles.
    pub backend: StoreBackend,
    /// Path to the database file.
    /// Defaults to `~/.local/share/splitflap/titles.db`
    pub database_path: Option<PathBuf>,
    /// Key the title list is stored under.
    pub titles_key: String,
}

/// Rotation-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Milliseconds between title changes.
    pub interval_ms: u64,
}

/// Layout-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// One row per word, or the whole title on one row.
    pub mode: LayoutMode,
    /// Container width used until a resize says otherwise.
    pub container_width_px: f64,
}

/// Optional overrides; unset fields come from the layout mode's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Horizontal padding in pixels.
    pub padding_px: Option<f64>,
    /// Cell width as a multiple of the font size.
    pub char_width_factor: Option<f64>,
    /// Smallest font size.
    pub min_size_px: Option<f64>,
    /// Largest font size.
    pub max_size_px: Option<f64>,
}

/// Flap animation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlapConfig {
    /// Milliseconds per flap step.
    pub flip_ms: u64,
    /// Draw intermediate flaps instead of jumping to the result.
    pub animate: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_path: None, // Resolved at runtime
            titles_key: TITLES_KEY.to_string(),
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self { interval_ms: 4000 }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            container_width_px: 480.0,
        }
    }
}

impl Default for FlapConfig {
    fn default() -> Self {
        Self {
            flip_ms: 30,
            animate: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SPLITFLAP_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.rotation.interval_ms == 0 {
            return Err(Error::config_validation(
                "rotation.interval_ms must be greater than 0",
            ));
        }

        if self.storage.titles_key.trim().is_empty() {
            return Err(Error::config_validation(
                "storage.titles_key must not be empty",
            ));
        }

        if !self.layout.container_width_px.is_finite() {
            return Err(Error::config_validation(
                "layout.container_width_px must be a finite number",
            ));
        }

        let profile = self.sizing_profile();
        let finite = [
            profile.padding_px,
            profile.char_width_factor,
            profile.min_size_px,
            profile.max_size_px,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(Error::config_validation(
                "sizing values must be finite numbers",
            ));
        }
        if profile.char_width_factor <= 0.0 {
            return Err(Error::config_validation(format!(
                "sizing.char_width_factor ({}) must be greater than 0",
                profile.char_width_factor
            )));
        }
        if profile.min_size_px > profile.max_size_px {
            return Err(Error::config_validation(format!(
                "sizing.min_size_px ({}) cannot be greater than sizing.max_size_px ({})",
                profile.min_size_px, profile.max_size_px
            )));
        }

        Ok(())
    }

    /// A copy using `mode` for layout, validated again since sizing
    /// overrides are checked against the layout's own profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the overrides are invalid for `mode`.
    pub fn with_layout_mode(&self, mode: LayoutMode) -> Result<Self> {
        let mut config = self.clone();
        config.layout.mode = mode;
        config.validate()?;
        Ok(config)
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The layout mode's sizing profile with any overrides applied.
    #[must_use]
    pub fn sizing_profile(&self) -> SizingProfile {
        let base = self.layout.mode.profile();
        SizingProfile {
            padding_px: self.sizing.padding_px.unwrap_or(base.padding_px),
            char_width_factor: self
                .sizing
                .char_width_factor
                .unwrap_or(base.char_width_factor),
            min_size_px: self.sizing.min_size_px.unwrap_or(base.min_size_px),
            max_size_px: self.sizing.max_size_px.unwrap_or(base.max_size_px),
        }
    }

    /// Get the rotation interval as a Duration.
    #[must_use]
    pub fn rotation_interval(&self) -> Duration {
        Duration::from_millis(self.rotation.interval_ms)
    }

    /// Get the flap step interval as a Duration.
    #[must_use]
    pub fn flip_interval(&self) -> Duration {
        Duration::from_millis(self.flap.flip_ms)
    }
}
