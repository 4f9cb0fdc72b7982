//! Configuration module
//!
//! This module contains components for loading and validating configuration.

mod loader;
mod model;

pub use loader::{
    load_config, load_with_overrides, parse_config, parse_config_file, resolve_config_path,
};
pub use model::{AssistantConfig, Config, ConfigOverrides};
