//! Configuration
//!
//! Loaded from a TOML file (explicit path, or `<config dir>/econviz/config.toml`)
//! with environment overrides. Every field has a default, so an empty file and
//! a missing file behave the same.
//!
//! ```toml
//! [api]
//! base_url = "https://api.worldbank.org/v2"
//! timeout_secs = 30
//!
//! [dashboard]
//! countries = ["South Africa", "Nigeria"]
//! indicator = "GDP growth (%)"
//! start_year = 2001
//! end_year = 2022
//!
//! [chart]
//! legend = "right"
//! ```

use crate::error::ConfigError;
use crate::models::RowOrder;
use crate::viz::LegendMode;
use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub chart: ChartConfig,
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default)]
    pub order: RowOrder,
}

fn default_base_url() -> String {
    "https://api.worldbank.org/v2".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_per_page() -> u32 {
    100
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            per_page: default_per_page(),
            order: RowOrder::default(),
        }
    }
}

/// Initial selection shown by the CLI and GUI.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,

    #[serde(default = "default_indicator")]
    pub indicator: String,

    #[serde(default = "default_start_year")]
    pub start_year: i32,

    #[serde(default = "default_end_year")]
    pub end_year: i32,

    #[serde(default)]
    pub log_scale: bool,
}

fn default_countries() -> Vec<String> {
    vec!["South Africa".to_string(), "Nigeria".to_string()]
}

fn default_indicator() -> String {
    "GDP (current US$)".to_string()
}

fn default_start_year() -> i32 {
    2001
}

fn default_end_year() -> i32 {
    2022
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            countries: default_countries(),
            indicator: default_indicator(),
            start_year: default_start_year(),
            end_year: default_end_year(),
            log_scale: false,
        }
    }
}

/// Chart rendering defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default = "default_legend")]
    pub legend: LegendMode,

    #[serde(default = "default_markers")]
    pub markers: bool,
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_legend() -> LegendMode {
    crate::viz::DEFAULT_LEGEND_MODE
}

fn default_markers() -> bool {
    true
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            locale: default_locale(),
            legend: default_legend(),
            markers: default_markers(),
        }
    }
}

impl Config {
    /// Parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load an explicit file (errors are fatal) or the default location
    /// (errors are logged and defaults used), then apply env overrides.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => {
                let c = Self::load(path)?;
                info!("loaded config from {}", path.display());
                c
            }
            None => Self::load_default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// `<config dir>/econviz/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("econviz").join("config.toml"))
    }

    fn load_default() -> Self {
        let Some(path) = Self::default_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(c) => {
                info!("loaded config from {}", path.display());
                c
            }
            Err(e) => {
                warn!("ignoring config: {e}");
                Self::default()
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base) = std::env::var("ECONVIZ_API_BASE") {
            self.api.base_url = base;
        }
        if let Ok(secs) = std::env::var("ECONVIZ_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!("ECONVIZ_TIMEOUT_SECS={secs:?} is not a number; ignored"),
            }
        }
    }
}
