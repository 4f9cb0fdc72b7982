//! Chat completions backed transformer
//!
//! Sends each file to an OpenAI-compatible `/chat/completions` endpoint
//! (Groq by default) and returns the first choice's message content.

use std::env;
use std::time::Duration;

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::AssistantConfig;
use crate::errors::{
    Result, TransformationReason, transformation_error, transformation_error_from,
};

use super::capability::Transformer;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Transformer that asks a chat completions endpoint to convert each file
pub struct ChatCompletionsTransformer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    system_prompt: String,
    prompt_preamble: String,
}

impl ChatCompletionsTransformer {
    /// Creates the transformer, reading the API key from the environment
    /// variable named by `config.api_key_env`
    ///
    /// # Errors
    /// Returns a credentials error if the variable is unset or empty.
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                transformation_error(
                    TransformationReason::Credentials,
                    &format!("{} environment variable is not set", config.api_key_env),
                )
            })?;
        Self::with_api_key(config, api_key)
    }

    /// Creates the transformer with an explicit API key
    pub fn with_api_key(config: &AssistantConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| {
                transformation_error_from(e, TransformationReason::Other, "cannot build HTTP client")
            })?;

        Ok(ChatCompletionsTransformer {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            system_prompt: config.system_prompt.clone(),
            prompt_preamble: config.prompt_preamble.clone(),
        })
    }

    /// Builds the user message for a source file
    pub fn build_prompt(&self, source_text: &str) -> String {
        build_prompt(&self.prompt_preamble, source_text)
    }
}

impl Transformer for ChatCompletionsTransformer {
    fn transform(&self, source_text: &str) -> Result<String> {
        let prompt = self.build_prompt(source_text);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        debug!(
            "Requesting completion from {} ({} prompt bytes)",
            self.endpoint,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                transformation_error_from(e, TransformationReason::Upstream, "request failed")
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            transformation_error_from(
                e,
                TransformationReason::Upstream,
                "cannot read response body",
            )
        })?;

        if let Some(reason) = classify_status(status) {
            return Err(transformation_error(
                reason,
                &format!("endpoint answered {status}: {}", truncate(&body, 200)),
            ));
        }

        parse_completion(&body)
    }
}

/// Joins the preamble and the source text into the user message
pub fn build_prompt(preamble: &str, source_text: &str) -> String {
    if preamble.is_empty() {
        source_text.to_string()
    } else {
        format!("{preamble}\n\n{source_text}")
    }
}

/// Maps an unsuccessful HTTP status to a failure reason
pub fn classify_status(status: StatusCode) -> Option<TransformationReason> {
    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransformationReason::Credentials,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => TransformationReason::Quota,
        _ => TransformationReason::Upstream,
    })
}

/// Extracts the first choice's content from a chat completions body
pub fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        transformation_error_from(
            e,
            TransformationReason::MalformedResponse,
            "response is not a chat completion",
        )
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            transformation_error(
                TransformationReason::MalformedResponse,
                "response contains no message content",
            )
        })
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_build_prompt() {
        assert_eq!(build_prompt("Convert this.", "x = 1"), "Convert this.\n\nx = 1");
        assert_eq!(build_prompt("", "x = 1"), "x = 1");
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::OK), None);
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            Some(TransformationReason::Credentials)
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            Some(TransformationReason::Quota)
        );
        assert_eq!(
            classify_status(StatusCode::BAD_GATEWAY),
            Some(TransformationReason::Upstream)
        );
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id":"1","choices":[{"index":0,"message":{"role":"assistant","content":"fn main() {}"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "fn main() {}");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let error = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert_eq!(
            error.transformation_reason(),
            Some(TransformationReason::MalformedResponse)
        );

        let error = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Transformation);
        assert_eq!(
            error.transformation_reason(),
            Some(TransformationReason::MalformedResponse)
        );
    }

    #[test]
    fn test_missing_api_key_is_a_credentials_error() {
        let config = AssistantConfig {
            api_key_env: "RUSTIFY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AssistantConfig::default()
        };
        let error = ChatCompletionsTransformer::new(&config)
            .err()
            .expect("construction should fail without a key");
        assert_eq!(
            error.transformation_reason(),
            Some(TransformationReason::Credentials)
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
