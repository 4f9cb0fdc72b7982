//! Workflow context
//!
//! Per-file work items, their outcomes and the aggregated run summary.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{Error, ErrorKind};

/// One eligible file moving through read, transform and write
///
/// Created during traversal and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    input_path: PathBuf,
    relative_path: PathBuf,
    output_path: PathBuf,
}

impl FileTask {
    pub fn new(input_path: PathBuf, relative_path: PathBuf, output_path: PathBuf) -> Self {
        FileTask {
            input_path,
            relative_path,
            output_path,
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Path of the input file relative to the input root
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// The last stage a file reached before it finished or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Discovered,
    Read,
    Transformed,
    Written,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Discovered => "discovered",
            Stage::Read => "read",
            Stage::Transformed => "transformed",
            Stage::Written => "written",
        };
        f.write_str(label)
    }
}

/// Structured record of a file that could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Path relative to the input root
    pub relative_path: PathBuf,
    /// Last stage the file reached successfully
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
}

impl FailureRecord {
    pub fn new(relative_path: &Path, stage: Stage, error: &Error) -> Self {
        FailureRecord {
            relative_path: relative_path.to_path_buf(),
            stage,
            kind: error.kind(),
            message: describe_with_sources(error),
        }
    }
}

/// Renders an error followed by every cause not already part of its message
fn describe_with_sources(error: &Error) -> String {
    let mut message = error.to_string();
    let mut source = StdError::source(error);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} error after {}]: {}",
            self.relative_path.display(),
            self.kind,
            self.stage,
            self.message
        )
    }
}

/// How processing of a single file ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The converted text was written to the task's output path
    Written { task: FileTask, bytes: usize },
    /// The file failed at some stage
    Failed(FailureRecord),
    /// The run was cancelled before the file was started
    Skipped { relative_path: PathBuf },
}

impl FileOutcome {
    pub fn relative_path(&self) -> &Path {
        match self {
            FileOutcome::Written { task, .. } => task.relative_path(),
            FileOutcome::Failed(record) => &record.relative_path,
            FileOutcome::Skipped { relative_path } => relative_path,
        }
    }
}

/// Aggregate result of a full traversal run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of eligible files that were started
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Eligible files left untouched because the run was cancelled
    pub skipped: usize,
    pub cancelled: bool,
    /// Output files written during the run, in traversal order
    pub outputs: Vec<PathBuf>,
    /// One record per failed file, in traversal order
    pub failures: Vec<FailureRecord>,
    /// Directory entries that could not be enumerated
    pub unreadable: Vec<FailureRecord>,
}

impl RunSummary {
    /// Folds a file outcome into the summary
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Written { task, .. } => {
                self.processed += 1;
                self.succeeded += 1;
                self.outputs.push(task.output_path);
            }
            FileOutcome::Failed(record) => {
                self.processed += 1;
                self.failed += 1;
                self.failures.push(record);
            }
            FileOutcome::Skipped { .. } => {
                self.skipped += 1;
                self.cancelled = true;
            }
        }
    }

    /// True when every started file was converted and nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0 && self.unreadable.is_empty()
    }

    /// Looks up the failure recorded for a relative path
    pub fn failure_for(&self, relative_path: &Path) -> Option<&FailureRecord> {
        self.failures
            .iter()
            .find(|record| record.relative_path == relative_path)
    }
}

/// A planned conversion listed by a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOperation {
    pub source: PathBuf,
    /// Output path, or the reason none could be derived
    pub destination: std::result::Result<PathBuf, String>,
}

/// Cooperative cancellation flag shared between a run and its controller
///
/// Checked before each file is started; a file already in progress always
/// runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use crate::errors::{
        TransformationReason, read_error, transformation_error, transformation_error_from,
    };

    fn task(name: &str) -> FileTask {
        FileTask::new(
            PathBuf::from("/in").join(name),
            PathBuf::from(name),
            PathBuf::from("/out").join(name),
        )
    }

    #[test]
    fn test_summary_counts_outcomes() {
        let mut summary = RunSummary::default();
        summary.record(FileOutcome::Written {
            task: task("a.py"),
            bytes: 10,
        });
        let error = transformation_error(TransformationReason::Quota, "out of tokens");
        summary.record(FileOutcome::Failed(FailureRecord::new(
            Path::new("b.py"),
            Stage::Read,
            &error,
        )));

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.outputs, vec![PathBuf::from("/out/a.py")]);
        assert!(!summary.is_clean());
        assert!(!summary.cancelled);

        let failure = summary.failure_for(Path::new("b.py")).unwrap();
        assert_eq!(failure.kind, ErrorKind::Transformation);
        assert_eq!(failure.stage, Stage::Read);
    }

    #[test]
    fn test_skipped_marks_summary_cancelled() {
        let mut summary = RunSummary::default();
        summary.record(FileOutcome::Skipped {
            relative_path: PathBuf::from("c.py"),
        });

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.skipped, 1);
        assert!(summary.cancelled);
    }

    #[test]
    fn test_cancellation_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn test_failure_record_display() {
        let error = transformation_error(TransformationReason::Credentials, "bad key");
        let record = FailureRecord::new(Path::new("pkg/a.py"), Stage::Read, &error);
        let text = record.to_string();
        assert!(text.contains("pkg/a.py"));
        assert!(text.contains("transformation"));
        assert!(text.contains("bad key"));
    }

    #[test]
    fn test_failure_record_keeps_the_cause() {
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        let error =
            transformation_error_from(refused, TransformationReason::Upstream, "request failed");
        let record = FailureRecord::new(Path::new("a.py"), Stage::Read, &error);

        assert!(record.message.contains("request failed"));
        assert!(record.message.contains("connection refused"));
    }

    #[test]
    fn test_failure_record_does_not_repeat_the_cause() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = read_error(denied, PathBuf::from("/in/a.py"));
        let record = FailureRecord::new(Path::new("a.py"), Stage::Discovered, &error);

        assert_eq!(record.message.matches("access denied").count(), 1);
    }
}
