//! What the controller asks the rendering layer to do.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetSubmitEnabled(bool),
    SetInputEnabled(bool),
    ShowLoading(bool),
    SetInput(String),
    ShowResult { formula: String, explanation: String },
    SetInsertEnabled(bool),
    /// The shown formula has been written; the insert action is spent.
    MarkInserted,
    HistoryChanged { count: usize },
    Notify { kind: NoticeKind, message: String },
}

impl Intent {
    pub fn success(message: impl Into<String>) -> Self {
        Intent::Notify {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Intent::Notify {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Thin adapter that turns intents into UI calls.
pub trait PanelView {
    fn apply(&mut self, intent: &Intent);

    fn apply_all(&mut self, intents: &[Intent]) {
        for intent in intents {
            self.apply(intent);
        }
    }
}

/// View that only keeps what it was told, for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub intents: Vec<Intent>,
}

impl PanelView for RecordingView {
    fn apply(&mut self, intent: &Intent) {
        self.intents.push(intent.clone());
    }
}

impl RecordingView {
    /// Last value pushed for a boolean toggle selected by `pick`.
    pub fn last_toggle(&self, pick: impl Fn(&Intent) -> Option<bool>) -> Option<bool> {
        self.intents.iter().rev().find_map(pick)
    }

    pub fn notices(&self) -> Vec<(NoticeKind, &str)> {
        self.intents
            .iter()
            .filter_map(|intent| match intent {
                Intent::Notify { kind, message } => Some((*kind, message.as_str())),
                _ => None,
            })
            .collect()
    }
}
