//! Converted file writing
//!
//! Output files are replaced atomically: the text is written to a temporary
//! file in the destination directory which is then renamed over the target.

use std::fs::create_dir_all;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::{Result, path_mapping_error, write_error};

/// Creates the parent directory of `path` if it does not exist yet
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| path_mapping_error(path.to_path_buf(), "path has no parent directory"))?;
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    create_dir_all(parent)
        .map_err(|e| write_error(e, parent.to_path_buf(), "create directory"))
}

/// Replaces the contents of `path` with `contents`
///
/// Either the whole new text is visible at `path` afterwards or the previous
/// file is left untouched.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temporary = NamedTempFile::new_in(directory)
        .map_err(|e| write_error(e, path.to_path_buf(), "create temporary file for"))?;
    temporary
        .write_all(contents.as_bytes())
        .and_then(|_| temporary.flush())
        .map_err(|e| write_error(e, path.to_path_buf(), "write"))?;
    temporary
        .persist(path)
        .map_err(|e| write_error(e.error, path.to_path_buf(), "replace"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_write_atomically_overwrites() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out_rustified.rs");

        write_atomically(&target, "fn first() {}").unwrap();
        write_atomically(&target, "fn second() {}").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "fn second() {}");
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "no temporary files should remain");
    }

    #[test]
    fn test_ensure_parent_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a/b/c/file.rs");

        ensure_parent_dir(&target).unwrap();
        ensure_parent_dir(&target).unwrap();

        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing/file.rs");

        let error = write_atomically(&target, "x").unwrap_err();
        assert_eq!(error.kind(), crate::errors::ErrorKind::Write);
    }
}
