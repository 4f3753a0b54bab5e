//! HTTP client for the relay's `/api/generate` endpoint.

use crate::formula::FormulaResult;
use crate::panel::{FormulaGenerator, PanelError};
use crate::relay::PromptRequest;
use crate::server::handlers::GENERATE_PATH;
use crate::server::wire::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};
use url::Url;

const MSG_GENERATION_FAILED: &str = "Failed to generate formula";

#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    endpoint: Url,
}

impl RelayClient {
    /// `base_url` is the relay origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self, PanelError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(GENERATE_PATH))
            .map_err(|e| PanelError::InvalidRelayUrl(e.to_string()))?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait(?Send)]
impl FormulaGenerator for RelayClient {
    async fn generate(&self, request: &PromptRequest) -> Result<FormulaResult, PanelError> {
        debug!(endpoint = %self.endpoint, "Calling relay");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&GenerateRequest {
                prompt: Some(request.prompt().to_string()),
            })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Relay request failed");
                PanelError::generation(e.to_string())
            })?;

        let status = response.status();
        let body = response.json::<GenerateResponse>().await.ok();

        let body = match body {
            Some(body) if status.is_success() && body.success => body,
            Some(body) => {
                let fallback = if status.is_success() {
                    MSG_GENERATION_FAILED.to_string()
                } else {
                    format!("HTTP {}", status.as_u16())
                };
                return Err(PanelError::generation(body.error.unwrap_or(fallback)));
            }
            None if !status.is_success() => {
                return Err(PanelError::generation(format!("HTTP {}", status.as_u16())))
            }
            None => return Err(PanelError::generation(MSG_GENERATION_FAILED)),
        };

        let formula = body.formula.unwrap_or_default();
        FormulaResult::new(formula, body.explanation.unwrap_or_default())
            .map_err(|_| PanelError::generation("Server returned an invalid formula"))
    }
}
