//! Transformation module
//!
//! The [`Transformer`] capability, its chat completions implementation and
//! the decorators layered around it.

mod capability;
mod chat;
mod fences;
mod retry;

use std::time::Duration;

pub use capability::Transformer;
pub use chat::{
    ChatCompletionsTransformer, build_prompt, classify_status, parse_completion,
};
pub use fences::{StripCodeFences, strip_code_fences};
pub use retry::RetryingTransformer;

use crate::config::AssistantConfig;
use crate::errors::Result;

/// Builds the transformer described by the assistant configuration
///
/// The chat completions client is wrapped in a retry decorator and, when
/// requested, a code fence stripper.
pub fn build_transformer(config: &AssistantConfig) -> Result<Box<dyn Transformer>> {
    let chat = ChatCompletionsTransformer::new(config)?;
    let retrying = RetryingTransformer::new(
        chat,
        config.max_retries,
        Duration::from_millis(config.retry_base_delay_ms),
    );

    if config.strip_code_fences {
        Ok(Box::new(StripCodeFences::new(retrying)))
    } else {
        Ok(Box::new(retrying))
    }
}
