use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One past generation: what was asked and what came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub prompt: String,
    pub formula: String,
    #[serde(default)]
    pub explanation: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        prompt: impl Into<String>,
        formula: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            formula: formula.into(),
            explanation: explanation.into(),
            timestamp: Utc::now(),
        }
    }
}
