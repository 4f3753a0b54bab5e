//! # Completion service client
//!
//! Talks to the external text-completion service on behalf of the relay.
//! - `send`: builds and issues the chat-completions request
//! - `receive`: turns the reply text into a validated [`FormulaResult`]
//!
//! ```text
//! prompt → send.rs (system instruction + user message) → completion text → receive.rs (formula, explanation)
//! ```
//!
//! [`FormulaResult`]: crate::formula::FormulaResult

pub mod receive;
pub mod send;

pub use receive::{parse_completion, CompletionError};
pub use send::{OpenAiClient, FORMULA_SYSTEM_PROMPT};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("Network error: {reason}")]
    Transport { reason: String },
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("Failed to decode completion response: {reason}")]
    Decode { reason: String },
    #[error("Completion response contained no choices")]
    NoChoices,
}

/// One system instruction plus one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

impl CompletionRequest {
    /// Request for a formula, using the fixed formula instruction.
    pub fn formula(prompt: impl Into<String>) -> Self {
        Self {
            system: FORMULA_SYSTEM_PROMPT.to_string(),
            user: prompt.into(),
        }
    }
}

/// Text-completion backend. Returns the raw completion text of the first
/// choice; interpreting it is left to the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LLMError>;
}
