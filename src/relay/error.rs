//! Relay error taxonomy and its HTTP status mapping.

use crate::llm::{CompletionError, LLMError};
use thiserror::Error;

/// Status used when the completion service could not be reached at all.
pub const BAD_GATEWAY: u16 = 502;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Prompt is required and must be a non-empty string")]
    InvalidInput,
    #[error("Server configuration error: OpenAI API key not set")]
    NotConfigured,
    #[error("{message}")]
    UpstreamUnavailable { status: Option<u16>, message: String },
    #[error("Generated response does not contain a valid Excel formula")]
    MalformedCompletion,
    #[error("Internal server error")]
    InternalError,
}

impl RelayError {
    pub fn status(&self) -> u16 {
        match self {
            RelayError::InvalidInput | RelayError::MalformedCompletion => 400,
            RelayError::NotConfigured | RelayError::InternalError => 500,
            RelayError::UpstreamUnavailable { status, .. } => match status {
                Some(code @ 400..=599) => *code,
                _ => BAD_GATEWAY,
            },
        }
    }
}

impl From<LLMError> for RelayError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Transport { reason } => RelayError::UpstreamUnavailable {
                status: None,
                message: reason,
            },
            LLMError::Upstream { status, message } => RelayError::UpstreamUnavailable {
                status: Some(status),
                message,
            },
            LLMError::Decode { .. } | LLMError::NoChoices => RelayError::InternalError,
        }
    }
}

impl From<CompletionError> for RelayError {
    fn from(_: CompletionError) -> Self {
        RelayError::MalformedCompletion
    }
}
