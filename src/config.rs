//! Persisted defaults for the command line tool

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when reading or writing the app config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Paths remembered between runs; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Font used to paint sheet text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,

    /// Font whose visual height other fonts are matched to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_font_path: Option<PathBuf>,

    /// Directory listed by `--list-fonts`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts_dir: Option<PathBuf>,

    /// Template sheet for tiled output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,

    /// Directory output files are written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Read a config file, falling back to defaults when it is missing,
    /// unreadable or malformed
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring config '{}': {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the config as pretty TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fill unset fields from `other`
    pub fn merged_with(mut self, other: AppConfig) -> Self {
        self.font_path = self.font_path.or(other.font_path);
        self.reference_font_path = self.reference_font_path.or(other.reference_font_path);
        self.fonts_dir = self.fonts_dir.or(other.fonts_dir);
        self.template_path = self.template_path.or(other.template_path);
        self.output_dir = self.output_dir.or(other.output_dir);
        self
    }
}
