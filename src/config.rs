//! Viewer configuration.
//!
//! Read from the JSON file named by `HEADMOTION_CONFIG`, else from
//! `headmotion.json` in the working directory, else built-in defaults.
//! Every field is optional in the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "HEADMOTION_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "headmotion.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory the source names are resolved against.
    pub data_dir: PathBuf,
    /// Sources loaded at start-up.  Names without extension mean `.csv`.
    pub sources: Vec<String>,
    pub playback: PlaybackConfig,
    pub axes: AxesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Samples skipped per tick.
    pub step: usize,
    /// Seconds between ticks.
    pub interval_s: f64,
    /// Pixels of head travel per millimetre.
    pub head_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    /// Fixed `[min, max]` of the projection scatter, in mm.
    pub position_domain: [f64; 2],
    /// Upper bound of every displacement axis, in mm.
    pub displacement_max: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            sources: vec![
                "NM0001-cleaned".to_string(),
                "NM0004-cleaned".to_string(),
                "NM0011-cleaned".to_string(),
            ],
            playback: PlaybackConfig::default(),
            axes: AxesConfig::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step: 2,
            interval_s: 0.001,
            head_scale: 1.5,
        }
    }
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            position_domain: [-50.0, 60.0],
            displacement_max: 55.0,
        }
    }
}

impl ViewerConfig {
    /// Load from `HEADMOTION_CONFIG` or [`DEFAULT_CONFIG_FILE`], falling back
    /// to defaults when neither exists.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_path(path)
        } else {
            log::debug!("No {DEFAULT_CONFIG_FILE}, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.playback.step == 0 {
            return Err(ConfigError::Invalid("playback.step must be at least 1".into()));
        }
        if !(self.playback.interval_s >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "playback.interval_s must be non-negative, got {}",
                self.playback.interval_s
            )));
        }
        let [lo, hi] = self.axes.position_domain;
        if !(lo < hi) {
            return Err(ConfigError::Invalid(format!(
                "axes.position_domain must be increasing, got [{lo}, {hi}]"
            )));
        }
        if !(self.axes.displacement_max > 0.0) {
            return Err(ConfigError::Invalid("axes.displacement_max must be positive".into()));
        }
        Ok(())
    }

    /// Paths of the configured sources.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.sources
            .iter()
            .map(|name| crate::data::loader::source_path(&self.data_dir, name))
            .collect()
    }
}
