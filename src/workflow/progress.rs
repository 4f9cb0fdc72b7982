//! Progress notifications
//!
//! The engine reports the start and the end of every file to a
//! [`ProgressListener`]. With parallel jobs the calls may interleave.

use std::path::Path;

use log::{error, info, trace};

use super::context::FileOutcome;

/// Receives one notification when a file starts and one when it ends
pub trait ProgressListener: Sync {
    fn on_start(&self, relative_path: &Path);

    fn on_finish(&self, outcome: &FileOutcome);

    /// Called with the converted text before it is written
    fn on_transformed(&self, _relative_path: &Path, _text: &str) {}
}

/// Reports progress through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressListener for LogProgress {
    fn on_start(&self, relative_path: &Path) {
        info!("Processing file: {}", relative_path.display());
    }

    fn on_finish(&self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Written { task, bytes } => info!(
                "Saved converted file: {} ({bytes} bytes)",
                task.output_path().display()
            ),
            FileOutcome::Failed(record) => error!(
                "Error processing {}: {}",
                record.relative_path.display(),
                record.message
            ),
            FileOutcome::Skipped { relative_path } => {
                info!("Skipped {} (run cancelled)", relative_path.display())
            }
        }
    }

    fn on_transformed(&self, relative_path: &Path, text: &str) {
        trace!(
            "Transformation received for {}:\n{text}",
            relative_path.display()
        );
    }
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressListener for NoProgress {
    fn on_start(&self, _relative_path: &Path) {}

    fn on_finish(&self, _outcome: &FileOutcome) {}
}
