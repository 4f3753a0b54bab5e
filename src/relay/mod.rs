//! Stateless relay between the panel and the completion service.
//! One outbound call per request, no retries, no caching.

pub mod error;


pub use error::RelayError;

use crate::config::Config;
use crate::formula::FormulaResult;
use crate::llm::receive::truncate;
use crate::llm::{parse_completion, CompletionClient, CompletionRequest, LLMError, OpenAiClient};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// A prompt that passed validation: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    prompt: String,
}

impl PromptRequest {
    pub fn new(raw: &str) -> Result<Self, RelayError> {
        let prompt = raw.trim();
        if prompt.is_empty() {
            return Err(RelayError::InvalidInput);
        }
        Ok(Self {
            prompt: prompt.to_string(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Clone)]
pub struct CompletionRelay {
    client: Option<Arc<dyn CompletionClient>>,
}

impl CompletionRelay {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A relay without a credential. Every request fails with
    /// [`RelayError::NotConfigured`].
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn from_config(config: &Config) -> Result<Self, LLMError> {
        match &config.api_key {
            Some(key) => {
                let client = OpenAiClient::new(key.clone(), config.generation.clone())?;
                Ok(Self::new(Arc::new(client)))
            }
            None => Ok(Self::unconfigured()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    #[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn generate(&self, prompt: &str) -> Result<FormulaResult, RelayError> {
        let request = PromptRequest::new(prompt)?;

        let client = self.client.as_ref().ok_or_else(|| {
            error!("OpenAI API key not configured");
            RelayError::NotConfigured
        })?;

        let text = client
            .complete(&CompletionRequest::formula(request.prompt()))
            .await
            .map_err(|e| {
                error!(error = %e, detail = ?e, "Completion request failed");
                RelayError::from(e)
            })?;
        let result = parse_completion(&text)?;

        info!(
            prompt = %truncate(request.prompt(), 50),
            "Formula generated successfully"
        );
        Ok(result)
    }
}
