//! Directory scanning functionality
//!
//! This module walks the input root and collects the eligible files.

use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::errors::{Error, Result, read_error, root_not_found_error};
use crate::utils::is_hidden_file;

use super::eligibility::EligibilityPredicate;

/// Options narrowing the traversal
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Glob patterns matched against paths relative to the input root.
    /// A matching directory is not descended into.
    pub exclude: Vec<Pattern>,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
    /// Directories, relative to the root, that are never entered
    pub skip_dirs: Vec<PathBuf>,
}

impl ScanOptions {
    /// Returns true if the entry should be left out of the traversal
    pub fn is_excluded(&self, relative_path: &Path, path: &Path) -> bool {
        if self.skip_hidden && is_hidden_file(path) {
            return true;
        }
        if self.skip_dirs.iter().any(|dir| dir == relative_path) {
            return true;
        }
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
    }
}

/// A directory entry that could not be enumerated
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Files found by [`scan_tree`]
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Eligible files, depth-first and sorted by name within each directory
    pub files: Vec<PathBuf>,
    /// Entries below the root that could not be read
    pub unreadable: Vec<ScanFailure>,
}

/// Fails unless `root` is an existing directory
pub fn ensure_input_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(root_not_found_error(root.to_path_buf()))
    }
}

/// Recursively collects the eligible files below `root`
///
/// Traversal is depth-first with entries sorted by file name, so two scans of
/// an unchanged tree list files in the same order. Files rejected by the
/// predicate are skipped silently. Unreadable subdirectories are reported in
/// [`ScanResult::unreadable`] and do not stop the scan.
///
/// # Errors
/// * `root` does not exist or is not a directory
/// * `root` itself cannot be listed
pub fn scan_tree(
    root: &Path,
    predicate: &dyn EligibilityPredicate,
    options: &ScanOptions,
) -> Result<ScanResult> {
    ensure_input_root(root)?;
    debug!("Scanning directory: {}", root.display());

    let mut result = ScanResult::default();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_pruned(root, entry, options));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if !is_regular_file(&entry) {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(root) else {
                    continue;
                };
                if predicate.is_eligible(relative) {
                    result.files.push(entry.into_path());
                }
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                let depth = err.depth();
                let io_error = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop detected"));

                if depth == 0 {
                    return Err(read_error(io_error, path));
                }

                warn!("Cannot read {}: {io_error}", path.display());
                result.unreadable.push(ScanFailure {
                    error: read_error(io_error, path.clone()),
                    path,
                });
            }
        }
    }

    debug!("Found {} eligible files", result.files.len());

    Ok(result)
}

fn is_pruned(root: &Path, entry: &DirEntry, options: &ScanOptions) -> bool {
    match entry.path().strip_prefix(root) {
        Ok(relative) => options.is_excluded(relative, entry.path()),
        Err(_) => false,
    }
}

// Symlinked directories are not followed, symlinked files are read.
fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
