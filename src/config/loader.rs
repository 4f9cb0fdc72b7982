//! Configuration loading functionality
//!
//! This module contains functions for locating, loading and validating
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use serde_yaml::from_str;

use crate::constants::{APPLICATION, ORGANIZATION, QUALIFIER};

use super::model::{Config, ConfigOverrides};

/// Loads a configuration from a file
///
/// Paths in the file are expanded and the result is validated.
///
/// # Errors
/// Returns an error if the file cannot be read or if the configuration is invalid
pub fn load_config(file: &Path) -> Result<Config> {
    let mut config = parse_config_file(file)?;
    config.expand_paths();
    config.validate()?;
    Ok(config)
}

/// Reads and parses a configuration file without validating it
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid YAML
pub fn parse_config_file(file: &Path) -> Result<Config> {
    let file_content = fs::read(file).map_err(|e| {
        anyhow!(
            "Failed to read configuration file {}: {}",
            file.display(),
            e
        )
    })?;

    let content_str = String::from_utf8(file_content).map_err(|e| {
        anyhow!(
            "Configuration file {} contains invalid UTF-8 characters: {}",
            file.display(),
            e
        )
    })?;

    parse_config(&content_str).map_err(|e| {
        anyhow!(
            "Failed to parse configuration file {}: {}\nPlease check the YAML syntax.",
            file.display(),
            e
        )
    })
}

/// Parses configuration from YAML text; an empty document yields the defaults
pub fn parse_config(content: &str) -> std::result::Result<Config, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    from_str(content)
}

/// Locates the configuration file
///
/// A path that exists is used as is. Otherwise the file name is looked up in
/// the platform configuration directory. When neither exists, an explicitly
/// requested file is an error while the default file name silently falls back
/// to built-in defaults (`Ok(None)`).
pub fn resolve_config_path(config: &Path, explicit: bool) -> Result<Option<PathBuf>> {
    if config.exists() {
        return Ok(Some(config.to_path_buf()));
    }

    if let Some(folder) = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION) {
        let candidate = folder.config_dir().join(config);
        if candidate.exists() {
            debug!("Using configuration from {}", candidate.display());
            return Ok(Some(candidate));
        }
    }

    if explicit {
        Err(anyhow!(
            "Configuration file {} does not exist.",
            config.display()
        ))
    } else {
        Ok(None)
    }
}

/// Loads the configuration, applies command line overrides, then validates
///
/// Overrides are applied before validation so a command line value can
/// replace an unusable value from the file.
pub fn load_with_overrides(
    config: &Path,
    explicit: bool,
    overrides: ConfigOverrides,
) -> Result<Config> {
    let mut config = match resolve_config_path(config, explicit)? {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            parse_config_file(&path)?
        }
        None => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };
    config.apply_overrides(overrides);
    config.expand_paths();
    config.validate()?;
    Ok(config)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathValue {
    Text(String),
    Segments(Vec<String>),
}

impl From<PathValue> for PathBuf {
    fn from(value: PathValue) -> Self {
        match value {
            PathValue::Text(text) => PathBuf::from(text),
            PathValue::Segments(segments) => segments.iter().collect(),
        }
    }
}

/// Deserializes a path written either as a string or as an array of segments
pub fn deserialize_path<'de, D>(deserializer: D) -> std::result::Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    PathValue::deserialize(deserializer).map(PathBuf::from)
}

/// Optional variant of [`deserialize_path`]
pub fn deserialize_optional_path<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<PathValue>::deserialize(deserializer).map(|value| value.map(PathBuf::from))
}
