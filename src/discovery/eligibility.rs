//! Eligibility predicates
//!
//! Decide which files under the input root are sent to the assistant.

use std::path::Path;

/// Decides whether a file is a candidate for conversion
///
/// Receives the file's path relative to the input root.
pub trait EligibilityPredicate: Sync {
    fn is_eligible(&self, relative_path: &Path) -> bool;
}

impl<F> EligibilityPredicate for F
where
    F: Fn(&Path) -> bool + Sync,
{
    fn is_eligible(&self, relative_path: &Path) -> bool {
        self(relative_path)
    }
}

/// Default predicate: the file name ends with the configured extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extension: String,
}

impl ExtensionFilter {
    pub fn new(extension: &str) -> Self {
        ExtensionFilter {
            extension: extension.to_string(),
        }
    }
}

impl EligibilityPredicate for ExtensionFilter {
    fn is_eligible(&self, relative_path: &Path) -> bool {
        relative_path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(self.extension.as_str()))
            .unwrap_or(false)
    }
}
