use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use shellexpand::{full, tilde};

use crate::constants::{APPLICATION, ORGANIZATION, QUALIFIER};
use crate::errors::{Result, generic_error, write_error};

/// Expands `~` and environment variables in a path
///
/// Falls back to tilde-only expansion when a referenced variable is not set,
/// leaving the `$VAR` text in place.
pub fn expand_path(path: &str) -> String {
    match full(path) {
        Ok(expanded) => expanded.to_string(),
        Err(_) => tilde(path).to_string(),
    }
}

/// Expands a path and converts it into a `PathBuf`
pub fn expand_to_pathbuf(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(text) => PathBuf::from(expand_path(text)),
        None => path.to_path_buf(),
    }
}

pub(crate) fn find_project_folder() -> Result<ProjectDirs> {
    let folder = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| generic_error("Failed to determine project directories"))?;

    if !folder.config_dir().exists() {
        create_dir_all(folder.config_dir()).map_err(|e| {
            write_error(e, folder.config_dir().to_path_buf(), "create directory")
        })?;
    }
    Ok(folder)
}

#[cfg(unix)]
pub(crate) fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(windows)]
pub(crate) fn is_hidden_file(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;

    if let Ok(metadata) = path.metadata() {
        metadata.file_attributes() & 0x2 != 0 // FILE_ATTRIBUTE_HIDDEN
    } else {
        false
    }
}
