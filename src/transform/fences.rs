//! Markdown code fence removal
//!
//! Assistants tend to wrap the converted file in a single fenced block.
//! [`StripCodeFences`] unwraps such a response so the output file holds
//! only the code.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::Result;

use super::capability::Transformer;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A\s*```[\w+-]*[ \t]*\r?\n(.*?)\r?\n?```\s*\z")
        .expect("Failed to compile regex pattern for FENCED_BLOCK")
});

/// Returns the body of `text` if it is exactly one fenced block
///
/// Anything else, including text with prose around the block or several
/// blocks, is returned unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    match FENCED_BLOCK.captures(text).and_then(|captures| captures.get(1)) {
        Some(body) if !body.as_str().contains("```") => body.as_str(),
        _ => text,
    }
}

pub struct StripCodeFences<T> {
    inner: T,
}

impl<T: Transformer> StripCodeFences<T> {
    pub fn new(inner: T) -> Self {
        StripCodeFences { inner }
    }
}

impl<T: Transformer> Transformer for StripCodeFences<T> {
    fn transform(&self, source_text: &str) -> Result<String> {
        let text = self.inner.transform(source_text)?;
        Ok(strip_code_fences(&text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_single_block() {
        let response = "```rust\nfn main() {}\n```\n";
        assert_eq!(strip_code_fences(response), "fn main() {}");
    }

    #[test]
    fn test_strips_block_without_language() {
        let response = "```\nlet x = 1;\n```";
        assert_eq!(strip_code_fences(response), "let x = 1;");
    }

    #[test]
    fn test_keeps_prose_around_block() {
        let response = "Here you go:\n```rust\nfn main() {}\n```\nIt is viable.";
        assert_eq!(strip_code_fences(response), response);
    }

    #[test]
    fn test_keeps_multiple_blocks() {
        let response = "```rust\nfn a() {}\n```\n```rust\nfn b() {}\n```";
        assert_eq!(strip_code_fences(response), response);
    }

    #[test]
    fn test_decorator_unwraps_inner_result() {
        let inner = |_: &str| -> Result<String> { Ok("```rust\nstruct Agent;\n```".to_string()) };
        let stripping = StripCodeFences::new(inner);
        assert_eq!(stripping.transform("class Agent: pass").unwrap(), "struct Agent;");
    }
}
