use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Custom error type for the Rustify application
#[derive(Debug)]
pub enum Error {
    /// The input root does not exist or is not a directory
    RootNotFound { path: PathBuf },
    /// An output path could not be derived for a file
    PathMapping { path: PathBuf, detail: String },
    /// A source file could not be read or decoded
    Read { source: io::Error, path: PathBuf },
    /// The transformation capability did not produce a result
    Transformation {
        reason: TransformationReason,
        detail: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
    /// A converted file or its directory could not be written
    Write {
        source: io::Error,
        path: PathBuf,
        operation: String,
    },
    /// Error when a filename is not valid Unicode
    InvalidFilename { path: PathBuf },
    /// Generic error with a message
    Generic { message: String },
}

/// Why the transformation capability failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformationReason {
    /// The credential is missing or was rejected
    Credentials,
    /// The upstream service refused because of quota or rate limits
    Quota,
    /// The upstream service answered with an error status or was unreachable
    Upstream,
    /// The upstream answer could not be understood
    MalformedResponse,
    /// Any other capability-specific failure
    Other,
}

impl fmt::Display for TransformationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransformationReason::Credentials => "credentials",
            TransformationReason::Quota => "quota",
            TransformationReason::Upstream => "upstream",
            TransformationReason::MalformedResponse => "malformed response",
            TransformationReason::Other => "other",
        };
        f.write_str(label)
    }
}

/// Coarse classification of an [`Error`], used by run summaries and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RootNotFound,
    Path,
    Read,
    Transformation,
    Write,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::RootNotFound => "root not found",
            ErrorKind::Path => "path",
            ErrorKind::Read => "read",
            ErrorKind::Transformation => "transformation",
            ErrorKind::Write => "write",
            ErrorKind::Other => "other",
        };
        f.write_str(label)
    }
}

impl Error {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RootNotFound { .. } => ErrorKind::RootNotFound,
            Error::PathMapping { .. } | Error::InvalidFilename { .. } => ErrorKind::Path,
            Error::Read { .. } => ErrorKind::Read,
            Error::Transformation { .. } => ErrorKind::Transformation,
            Error::Write { .. } => ErrorKind::Write,
            Error::Generic { .. } => ErrorKind::Other,
        }
    }

    /// Returns the transformation reason, if this is a transformation error
    pub fn transformation_reason(&self) -> Option<TransformationReason> {
        match self {
            Error::Transformation { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RootNotFound { path } => {
                write!(f, "Input root does not exist: {}", path.display())
            }
            Error::PathMapping { path, detail } => {
                write!(f, "Cannot map {} to an output path: {detail}", path.display())
            }
            Error::Read { source, path } => {
                write!(f, "Failed to read file {}: {source}", path.display())
            }
            Error::Transformation { reason, detail, .. } => {
                write!(f, "Transformation failed ({reason}): {detail}")
            }
            Error::Write {
                source,
                path,
                operation,
            } => {
                write!(f, "Failed to {} {}: {source}", operation, path.display())
            }
            Error::InvalidFilename { path } => {
                write!(f, "Filename is not valid unicode: {}", path.display())
            }
            Error::Generic { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Read { source, .. } => Some(source),
            Error::Write { source, .. } => Some(source),
            Error::Transformation {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Custom Result type for the Rustify application
///
/// # Examples
/// ```
/// use rustify::prelude::{Result, generic_error};
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
///
///     // Or return an error
///     // Err(generic_error("Something went wrong"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create a root-not-found error
pub fn root_not_found_error(path: PathBuf) -> Error {
    Error::RootNotFound { path }
}

/// Helper function to create a path mapping error
pub fn path_mapping_error(path: PathBuf, detail: &str) -> Error {
    Error::PathMapping {
        path,
        detail: detail.to_string(),
    }
}

/// Helper function to create a read error
pub fn read_error(err: io::Error, path: PathBuf) -> Error {
    Error::Read { source: err, path }
}

/// Helper function to create a transformation error without an underlying cause
pub fn transformation_error(reason: TransformationReason, detail: &str) -> Error {
    Error::Transformation {
        reason,
        detail: detail.to_string(),
        source: None,
    }
}

/// Helper function to create a transformation error wrapping an underlying cause
pub fn transformation_error_from<E: StdError + Send + Sync + 'static>(
    err: E,
    reason: TransformationReason,
    detail: &str,
) -> Error {
    Error::Transformation {
        reason,
        detail: detail.to_string(),
        source: Some(Box::new(err)),
    }
}

/// Helper function to create a write error
pub fn write_error(err: io::Error, path: PathBuf, operation: &str) -> Error {
    Error::Write {
        source: err,
        path,
        operation: operation.to_string(),
    }
}

/// Helper function to create an invalid filename error
pub fn invalid_filename_error(path: PathBuf) -> Error {
    Error::InvalidFilename { path }
}

/// Helper function to create a generic error
pub fn generic_error(message: &str) -> Error {
    Error::Generic {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_not_found_error() {
        let error = root_not_found_error(PathBuf::from("/missing/root"));

        let error_string = format!("{error}");
        assert!(
            error_string.contains("/missing/root"),
            "Error message should contain the path"
        );
        assert_eq!(error.kind(), ErrorKind::RootNotFound);
    }

    #[test]
    fn test_path_mapping_error() {
        let error = path_mapping_error(PathBuf::from("/a/b.txt"), "missing extension");

        let error_string = format!("{error}");
        assert!(error_string.contains("/a/b.txt"));
        assert!(error_string.contains("missing extension"));
        assert_eq!(error.kind(), ErrorKind::Path);
    }

    #[test]
    fn test_read_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = read_error(io_error, PathBuf::from("/test/input.py"));

        let error_string = format!("{error}");
        assert!(
            error_string.contains("/test/input.py"),
            "Error message should contain the path"
        );
        assert!(error.source().is_some());
        assert_eq!(error.kind(), ErrorKind::Read);
    }

    #[test]
    fn test_transformation_error() {
        let error = transformation_error(TransformationReason::Quota, "rate limited");

        let error_string = format!("{error}");
        assert!(error_string.contains("quota"));
        assert!(error_string.contains("rate limited"));
        assert_eq!(error.kind(), ErrorKind::Transformation);
        assert_eq!(
            error.transformation_reason(),
            Some(TransformationReason::Quota)
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_transformation_error_from_keeps_source() {
        let io_error = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        let error =
            transformation_error_from(io_error, TransformationReason::Upstream, "request failed");

        assert!(error.source().is_some());
        assert_eq!(
            error.transformation_reason(),
            Some(TransformationReason::Upstream)
        );
    }

    #[test]
    fn test_write_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = write_error(io_error, PathBuf::from("/out/file.rs"), "write");

        let error_string = format!("{error}");
        assert!(error_string.contains("write"));
        assert!(error_string.contains("/out/file.rs"));
        assert_eq!(error.kind(), ErrorKind::Write);
    }

    #[test]
    fn test_generic_error() {
        let error = generic_error("Something went wrong");

        assert_eq!(format!("{error}"), "Something went wrong");
        assert_eq!(error.kind(), ErrorKind::Other);
        assert_eq!(error.transformation_reason(), None);
    }
}
