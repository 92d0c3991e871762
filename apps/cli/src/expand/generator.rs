//! Generative collaborator — the single point of entry for all model calls.
//!
//! The Expansion Controller only sees the `CodeGenerator` capability trait, so
//! its retry/fallback state machine is testable with scripted stand-ins. The
//! HTTP implementation speaks an OpenAI-compatible chat-completions endpoint.
//!
//! There is deliberately no retry-with-backoff here: the controller owns the
//! attempt budget, and a single communication error terminates the collaborator
//! interaction for the run.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ExpansionConfig;
use crate::expand::prompts::{build_expansion_prompt, EXPANSION_SYSTEM};

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Capability interface for obtaining synthetic source text.
///
/// A successful call returns the raw generated text (possibly empty — the
/// caller decides what an empty response means).
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(
        &self,
        context: &str,
        minimum_lines: usize,
    ) -> Result<String, GeneratorError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// HTTP-backed generator for an OpenAI-compatible chat-completions API.
#[derive(Clone)]
pub struct LlmGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl LlmGenerator {
    pub fn new(api_key: String, cfg: &ExpansionConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        })
    }
}

#[async_trait]
impl CodeGenerator for LlmGenerator {
    async fn generate(
        &self,
        context: &str,
        minimum_lines: usize,
    ) -> Result<String, GeneratorError> {
        let prompt = build_expansion_prompt(minimum_lines, context);
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: EXPANSION_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        debug!(
            "Generation call returned {} characters for a {}-line request",
            content.len(),
            minimum_lines
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serializes_expected_shape() {
        let request = ChatRequest {
            model: "qwen3-coder-flash",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: 0.75,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "qwen3-coder-flash");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_chat_response_parses_missing_content_as_none() {
        let json = r#"{"choices": [{"message": {"role": "assistant"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let mut cfg = ExpansionConfig::default();
        cfg.api_base_url = "https://example.test/v1/".to_string();
        let generator = LlmGenerator::new("key".to_string(), &cfg).unwrap();
        assert_eq!(generator.base_url, "https://example.test/v1");
    }
}
