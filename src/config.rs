use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fixtures::DEFAULT_FARMS;
use crate::metrics::generator::{TrendConfig, DEFAULT_WINDOW_DAYS};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ConfigFormat {
    Auto,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pin `Auto` to a concrete loader: `.yaml`/`.yml` read as YAML, anything
    /// else as TOML.
    pub fn for_path(self, path: &Path) -> Self {
        match (self, path.extension().and_then(|ext| ext.to_str())) {
            (Self::Auto, Some("yaml" | "yml")) => Self::Yaml,
            (Self::Auto, _) => Self::Toml,
            (explicit, _) => explicit,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read dashboard config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dashboard config is not valid {format:?}: {details}")]
    Parse {
        format: ConfigFormat,
        details: String,
    },
    #[error("dashboard config rejected: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub trend: TrendConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct DashboardSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    /// Shown in the farm selector only; never filters data.
    #[serde(default = "default_farms")]
    pub farms: Vec<String>,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Fixed noise seed. Unset means every render draws fresh noise.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            farms: default_farms(),
            window_days: default_window_days(),
            seed: None,
        }
    }
}

fn default_title() -> String {
    "Layer Farm Egg Production Dashboard".into()
}

fn default_subtitle() -> String {
    "Daily egg production monitoring".into()
}

fn default_farms() -> Vec<String> {
    DEFAULT_FARMS.iter().map(|f| f.to_string()).collect()
}

const fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.farms.is_empty() {
            return Err(ConfigError::Validation(
                "at least one farm must be listed".into(),
            ));
        }
        self.trend
            .validate_window(self.dashboard.window_days)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    pub fn sample() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path, format: ConfigFormat) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents, format.for_path(path))?;
    config.validate()?;
    Ok(config)
}

pub fn parse_config(contents: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    match format {
        ConfigFormat::Toml | ConfigFormat::Auto => {
            toml::from_str(contents).map_err(|err| ConfigError::Parse {
                format: ConfigFormat::Toml,
                details: err.to_string(),
            })
        }
        ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(|err| ConfigError::Parse {
            format,
            details: err.to_string(),
        }),
    }
}
