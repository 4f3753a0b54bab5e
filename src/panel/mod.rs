//! Panel-side orchestration: prompt input, generation, history, insertion.
//!
//! The [`PanelController`] is a pure state machine emitting [`Intent`]s.
//! [`Panel`] binds it to a [`FormulaGenerator`], a [`HostWorkbook`] and a
//! [`PanelView`] on a single-threaded event loop.

pub mod client;
pub mod controller;
pub mod driver;
pub mod host;
pub mod intent;


pub use client::RelayClient;
pub use controller::{PanelController, PanelState, Submission};
pub use driver::Panel;
pub use host::{CellContent, CellWrite, HostWorkbook, InsertionError, MemoryWorkbook};
pub use intent::{Intent, NoticeKind, PanelView, RecordingView};

use crate::formula::FormulaResult;
use crate::relay::{CompletionRelay, PromptRequest};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("{message}")]
    Generation { message: String },
    #[error("Invalid relay URL: {0}")]
    InvalidRelayUrl(String),
    #[error(transparent)]
    InsertionFailed(#[from] InsertionError),
}

impl PanelError {
    pub fn generation(message: impl Into<String>) -> Self {
        PanelError::Generation {
            message: message.into(),
        }
    }
}

/// Source of formulas for the panel.
#[async_trait(?Send)]
pub trait FormulaGenerator {
    async fn generate(&self, request: &PromptRequest) -> Result<FormulaResult, PanelError>;
}

/// In-process generation, skipping the HTTP hop.
#[async_trait(?Send)]
impl FormulaGenerator for CompletionRelay {
    async fn generate(&self, request: &PromptRequest) -> Result<FormulaResult, PanelError> {
        CompletionRelay::generate(self, request.prompt())
            .await
            .map_err(|e| PanelError::generation(e.to_string()))
    }
}
