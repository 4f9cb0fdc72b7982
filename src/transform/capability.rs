//! The transformation capability
//!
//! Anything that turns source text into converted text implements
//! [`Transformer`]. The engine never looks behind this interface.

use crate::errors::Result;

/// Converts the text of one source file into the text to be written
///
/// A failure is reported as a transformation error and only affects the
/// file being processed. Implementations must be usable from several
/// threads when the engine runs with more than one job.
pub trait Transformer: Send + Sync {
    fn transform(&self, source_text: &str) -> Result<String>;
}

impl<F> Transformer for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn transform(&self, source_text: &str) -> Result<String> {
        self(source_text)
    }
}
