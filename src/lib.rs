//! Rustify walks a source tree, hands every eligible file to a text
//! transformation capability and writes each answer into a mirrored
//! output tree.

pub mod cli;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod errors;
pub mod file_ops;
pub mod logging;
pub mod path_gen;
pub mod transform;
pub mod utils;
pub mod workflow;

pub mod prelude {
    pub use crate::config::{Config, ConfigOverrides, load_config, load_with_overrides};
    pub use crate::discovery::{EligibilityPredicate, ExtensionFilter, ScanOptions};
    pub use crate::errors::{
        generic_error, invalid_filename_error, path_mapping_error, read_error,
        root_not_found_error, transformation_error, transformation_error_from, write_error,
    };
    pub use crate::errors::{Error, ErrorKind, Result, TransformationReason};
    pub use crate::logging::{LogLevel, format_message, init_logger};
    pub use crate::path_gen::{ExtensionRule, PathMapper};
    pub use crate::transform::{Transformer, build_transformer};
    pub use crate::workflow::{
        CancellationToken, FailureRecord, FileOutcome, ProgressListener, RunSummary, Stage,
        TreeTransformer,
    };
}
