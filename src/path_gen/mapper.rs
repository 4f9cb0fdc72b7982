//! Output path mapping
//!
//! Maps a file found under the input root to its mirrored location under the
//! output root, swapping the eligible extension for the output suffix.

use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, invalid_filename_error, path_mapping_error};
use crate::workflow::FileTask;

/// Extension rewrite applied to eligible file names
///
/// `ExtensionRule::new(".py", "_rustified.rs")` turns `agent.py` into
/// `agent_rustified.rs`. Only the trailing occurrence is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRule {
    eligible: String,
    replacement: String,
}

impl ExtensionRule {
    pub fn new(eligible: &str, replacement: &str) -> Self {
        ExtensionRule {
            eligible: eligible.to_string(),
            replacement: replacement.to_string(),
        }
    }

    /// The extension a file name must end with
    pub fn eligible(&self) -> &str {
        &self.eligible
    }

    /// The text that replaces the eligible extension
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Rewrites a file name, or returns `None` if it lacks the eligible
    /// extension or has nothing in front of it
    pub fn rewrite(&self, file_name: &str) -> Option<String> {
        let stem = file_name.strip_suffix(self.eligible.as_str())?;
        if stem.is_empty() {
            return None;
        }
        Some(format!("{stem}{}", self.replacement))
    }
}

/// Pure mapping from input file paths to output file paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    rule: ExtensionRule,
}

impl PathMapper {
    pub fn new(rule: ExtensionRule) -> Self {
        PathMapper { rule }
    }

    pub fn rule(&self) -> &ExtensionRule {
        &self.rule
    }

    /// Computes the output path for `file_path`
    ///
    /// The path is `output_root` joined with the path of `file_path` relative
    /// to `input_root`, with the file name rewritten by the extension rule.
    /// No filesystem access takes place.
    ///
    /// # Errors
    /// * `file_path` is not below `input_root`
    /// * the relative path climbs out of the root with `..`
    /// * the file name is not valid unicode or lacks the eligible extension
    pub fn map(&self, input_root: &Path, output_root: &Path, file_path: &Path) -> Result<PathBuf> {
        let relative = relative_path(input_root, file_path)?;

        let file_name = relative
            .file_name()
            .ok_or_else(|| path_mapping_error(file_path.to_path_buf(), "path has no file name"))?
            .to_str()
            .ok_or_else(|| invalid_filename_error(file_path.to_path_buf()))?;

        let new_name = self.rule.rewrite(file_name).ok_or_else(|| {
            path_mapping_error(
                file_path.to_path_buf(),
                &format!("file name does not end with '{}'", self.rule.eligible()),
            )
        })?;

        let mut output = output_root.to_path_buf();
        if let Some(parent) = relative.parent() {
            output.push(parent);
        }
        output.push(new_name);
        Ok(output)
    }

    /// Builds the [`FileTask`] for a discovered file
    pub fn task_for(&self, input_root: &Path, output_root: &Path, file_path: &Path) -> Result<FileTask> {
        let output_path = self.map(input_root, output_root, file_path)?;
        let relative_path = relative_path(input_root, file_path)?;
        Ok(FileTask::new(file_path.to_path_buf(), relative_path, output_path))
    }
}

/// Returns `file_path` relative to `input_root`
///
/// Fails if `file_path` is not a strict descendant of `input_root` or if the
/// remainder contains `..` segments.
pub fn relative_path(input_root: &Path, file_path: &Path) -> Result<PathBuf> {
    let relative = file_path.strip_prefix(input_root).map_err(|_| {
        path_mapping_error(
            file_path.to_path_buf(),
            &format!("not inside {}", input_root.display()),
        )
    })?;

    if relative.as_os_str().is_empty() {
        return Err(path_mapping_error(
            file_path.to_path_buf(),
            "path is the input root itself",
        ));
    }

    if relative
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(path_mapping_error(
            file_path.to_path_buf(),
            "relative path leaves the input root",
        ));
    }

    Ok(relative.to_path_buf())
}
