//! Configuration data structures
//!
//! This module contains the data structures for configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use glob::Pattern;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_ELIGIBLE_EXTENSION, DEFAULT_ENDPOINT, DEFAULT_INPUT_ROOT,
    DEFAULT_JOBS, DEFAULT_MODEL, DEFAULT_OUTPUT_EXTENSION_SUFFIX, DEFAULT_OUTPUT_ROOT_MARKER,
    DEFAULT_PROMPT_PREAMBLE, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TIMEOUT_SECS,
};
use crate::utils::expand_to_pathbuf;

use super::loader::{deserialize_optional_path, deserialize_path};

/// Configuration for a conversion run
///
/// Every key is optional in the YAML file; missing keys take the defaults
/// below.
///
/// ```yaml
/// input_root: ~/projects/swarms
/// output_root: [~, projects, swarms-rustified]
/// eligible_extension: .py
/// output_extension_suffix: _rustified.rs
/// exclude: ["**/__pycache__"]
/// jobs: 4
/// assistant:
///   model: llama-3.3-70b-versatile
///   max_retries: 2
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for source files
    #[serde(deserialize_with = "deserialize_path")]
    pub input_root: PathBuf,
    /// Directory receiving converted files; derived from the input root when unset
    #[serde(deserialize_with = "deserialize_optional_path")]
    pub output_root: Option<PathBuf>,
    /// File name ending that makes a file eligible
    pub eligible_extension: String,
    /// Replaces the eligible extension in output file names
    pub output_extension_suffix: String,
    /// Glob patterns, relative to the input root, that are never converted
    pub exclude: Vec<String>,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
    /// Replace undecodable bytes instead of failing the file
    pub lossy_decoding: bool,
    /// Number of files converted concurrently
    pub jobs: usize,
    /// Settings for the assistant that performs the conversion
    pub assistant: AssistantConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_root: PathBuf::from(DEFAULT_INPUT_ROOT),
            output_root: None,
            eligible_extension: DEFAULT_ELIGIBLE_EXTENSION.to_string(),
            output_extension_suffix: DEFAULT_OUTPUT_EXTENSION_SUFFIX.to_string(),
            exclude: Vec::new(),
            skip_hidden: false,
            lossy_decoding: true,
            jobs: DEFAULT_JOBS,
            assistant: AssistantConfig::default(),
        }
    }
}

/// Settings for the chat completions assistant
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AssistantConfig {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub system_prompt: String,
    /// Text placed before the file contents in the user message
    pub prompt_preamble: String,
    pub timeout_secs: u64,
    /// Extra attempts for transient failures
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    /// Unwrap responses that consist of a single Markdown code block
    pub strip_code_fences: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            prompt_preamble: DEFAULT_PROMPT_PREAMBLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            strip_code_fences: false,
        }
    }
}

impl AssistantConfig {
    fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(anyhow!(
                "Assistant endpoint '{}' must be an http or https URL.",
                self.endpoint
            ));
        }
        if self.model.trim().is_empty() {
            return Err(anyhow!("No assistant model specified in configuration."));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(anyhow!(
                "No API key environment variable specified in configuration."
            ));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("Assistant timeout must be at least one second."));
        }
        Ok(())
    }
}

/// Values given on the command line; each one replaces its file counterpart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub input_root: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub eligible_extension: Option<String>,
    pub output_extension_suffix: Option<String>,
    pub jobs: Option<usize>,
}

impl Config {
    /// Replaces configuration values with the ones given on the command line
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(input_root) = overrides.input_root {
            self.input_root = input_root;
        }
        if let Some(output_root) = overrides.output_root {
            self.output_root = Some(output_root);
        }
        if let Some(extension) = overrides.eligible_extension {
            self.eligible_extension = extension;
        }
        if let Some(suffix) = overrides.output_extension_suffix {
            self.output_extension_suffix = suffix;
        }
        if let Some(jobs) = overrides.jobs {
            self.jobs = jobs;
        }
    }

    /// Expands `~` and environment variables in the configured paths
    pub fn expand_paths(&mut self) {
        self.input_root = expand_to_pathbuf(&self.input_root);
        self.output_root = self.output_root.as_deref().map(expand_to_pathbuf);
    }

    /// The output root, derived as `<input-root-name>-rustified` next to the
    /// input root when not configured
    pub fn resolved_output_root(&self) -> PathBuf {
        if let Some(output_root) = &self.output_root {
            return output_root.clone();
        }
        let input_root = named_root(&self.input_root);
        let name = input_root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let parent = input_root.parent().unwrap_or_else(|| Path::new(""));
        parent.join(format!("{name}{DEFAULT_OUTPUT_ROOT_MARKER}"))
    }

    /// Compiles the exclusion globs
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>> {
        self.exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern)
                    .map_err(|e| anyhow!("Invalid exclude pattern '{pattern}': {e}"))
            })
            .collect()
    }

    /// Validates the configuration
    ///
    /// Checks the extension rewrite, the job count, the exclusion globs and
    /// the assistant settings. The input root is not checked here: a missing
    /// input root is reported by the run itself.
    ///
    /// # Errors
    /// Returns an error with a detailed message if validation fails
    pub fn validate(&self) -> Result<()> {
        if !self.eligible_extension.starts_with('.') || self.eligible_extension.len() < 2 {
            return Err(anyhow!(
                "Eligible extension '{}' must start with a dot and name an extension, e.g. '.py'.",
                self.eligible_extension
            ));
        }

        if self.output_extension_suffix.is_empty() {
            return Err(anyhow!(
                "Output extension suffix is empty. Output files would have no extension."
            ));
        }

        if self.output_extension_suffix.contains(['/', '\\']) {
            return Err(anyhow!(
                "Output extension suffix '{}' must not contain path separators.",
                self.output_extension_suffix
            ));
        }

        if self.resolved_output_root() == self.input_root
            && self.output_extension_suffix == self.eligible_extension
        {
            return Err(anyhow!(
                "Output root and suffix are identical to the input; source files would be overwritten."
            ));
        }

        if self.jobs == 0 {
            return Err(anyhow!("Jobs must be at least 1."));
        }

        self.exclude_patterns()?;
        self.assistant.validate()?;

        Ok(())
    }
}

/// Resolves roots such as `.` or `dir/..` that carry no final name
fn named_root(root: &Path) -> PathBuf {
    if root.file_name().is_some() {
        return root.to_path_buf();
    }
    fs::canonicalize(root)
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}
