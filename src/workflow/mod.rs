//! Workflow module
//!
//! This module contains components for orchestrating a conversion run.

mod context;
mod engine;
mod progress;
mod report;

pub use context::{
    CancellationToken, FailureRecord, FileOutcome, FileTask, PlannedOperation, RunSummary, Stage,
};
pub use engine::TreeTransformer;
pub use progress::{LogProgress, NoProgress, ProgressListener};
pub use report::{print_plan, print_summary, render_plan, render_summary};
