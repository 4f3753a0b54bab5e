use crate::config::GenerationConfig;
use crate::llm::{CompletionClient, CompletionRequest, LLMError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed instruction pinning the reply shape: formula on line 1, a short
/// explanation on the following lines.
pub const FORMULA_SYSTEM_PROMPT: &str = "You are an Excel formula expert. When asked for an Excel formula, reply with ONLY:
1. A valid Excel formula starting with \"=\" on the first line
2. A brief explanation (1-2 sentences) on the next line

Example reply:
=SUM(A1:A10)
This formula adds up all values in cells A1 through A10.

The formula must be valid Excel syntax and must start with \"=\".";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Deserialize, Debug)]
pub struct LLMResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: GenerationConfig,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, config: GenerationConfig) -> Result<Self, LLMError> {
        let client = Client::builder()
            .user_agent(concat!("xslgpt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LLMError::Transport {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn build_request(&self, request: &CompletionRequest) -> LLMRequest {
        LLMRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LLMError> {
        let body = self.build_request(request);
        debug!(model = %body.model, url = %self.config.api_url, "Calling completion service");

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LLMError::Transport {
                reason: if e.is_connect() {
                    "Connection error - unable to reach the completion service".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = upstream_error_message(status.as_u16(), &raw);
            debug!(status = status.as_u16(), %message, "Completion service returned an error");
            return Err(LLMError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LLMResponse = response.json().await.map_err(|e| LLMError::Decode {
            reason: e.to_string(),
        })?;

        let choice = llm_response.choices.into_iter().next().ok_or(LLMError::NoChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Picks `error.message` out of an upstream error body, falling back to the
/// bare status.
fn upstream_error_message(status: u16, raw_body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(raw_body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("OpenAI API error: {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiClient {
        OpenAiClient::new("test-key", GenerationConfig::default()).unwrap()
    }

    #[test]
    fn request_body_carries_instruction_and_prompt() {
        let body = client().build_request(&CompletionRequest::formula("sum column A"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 200);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], FORMULA_SYSTEM_PROMPT);
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "sum column A");
        assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn upstream_message_is_preferred() {
        let raw = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
        assert_eq!(upstream_error_message(429, raw), "Rate limit reached");
    }

    #[test]
    fn falls_back_to_status_text() {
        assert_eq!(upstream_error_message(503, "<html>busy</html>"), "OpenAI API error: 503");
        assert_eq!(upstream_error_message(500, r#"{"error": {}}"#), "OpenAI API error: 500");
    }

    #[test]
    fn response_without_content_decodes() {
        let parsed: LLMResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert!(parsed.choices[0].message.content.is_none());
    }
}
