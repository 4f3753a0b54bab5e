//! Panel state machine.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Idle (result shown, insert enabled)
//!                            └─err─▶ Idle (input kept)
//! ```
//!
//! No I/O happens here. Each transition returns the [`Intent`]s the view must
//! apply; the network call and the cell write are performed by the caller
//! between `submit`/`finish_generate` and `begin_insert`/`finish_insert`.

use crate::formula::{number_format_for, FormulaResult, InsertConfig};
use crate::history::{HistoryBackend, PromptHistoryStore};
use crate::panel::host::{CellWrite, InsertionError};
use crate::panel::intent::Intent;
use crate::panel::PanelError;
use crate::relay::PromptRequest;
use tracing::{debug, error, info, warn};

pub const MSG_EMPTY_PROMPT: &str = "Please enter a prompt";
pub const MSG_GENERATED: &str =
    "Formula generated successfully! Click \"Insert Formula\" to add it to Excel.";
pub const MSG_NOTHING_TO_INSERT: &str = "No formula available to insert";
pub const MSG_INSERTED: &str = "Formula inserted into Excel!";
pub const MSG_INSERT_FAILED: &str = "Failed to insert formula into Excel. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertState {
    Ready,
    Writing,
    Done,
}

#[derive(Debug, Clone)]
struct PendingFormula {
    id: u64,
    result: FormulaResult,
    insert: InsertState,
}

/// Outcome of a submit action.
#[derive(Debug)]
pub enum Submission {
    /// The caller must now run `request` and report back via
    /// [`PanelController::finish_generate`].
    Started {
        request: PromptRequest,
        intents: Vec<Intent>,
    },
    /// Input was empty.
    Rejected(Vec<Intent>),
    /// A request is already in flight.
    Ignored,
}

pub struct PanelController<B: HistoryBackend> {
    state: PanelState,
    input: String,
    pending: Option<PendingFormula>,
    next_formula_id: u64,
    history: PromptHistoryStore<B>,
    config: InsertConfig,
}

impl<B: HistoryBackend> PanelController<B> {
    pub fn new(history: PromptHistoryStore<B>, config: InsertConfig) -> Self {
        Self {
            state: PanelState::Idle,
            input: String::new(),
            pending: None,
            next_formula_id: 0,
            history,
            config,
        }
    }

    /// Intents that bring a fresh view in line with the controller.
    pub fn initial_intents(&self) -> Vec<Intent> {
        vec![
            Intent::SetInputEnabled(true),
            Intent::SetSubmitEnabled(self.can_submit()),
            Intent::SetInsertEnabled(false),
            Intent::ShowLoading(false),
            Intent::HistoryChanged {
                count: self.history.len(),
            },
        ]
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history(&self) -> &PromptHistoryStore<B> {
        &self.history
    }

    pub fn config(&self) -> &InsertConfig {
        &self.config
    }

    pub fn can_submit(&self) -> bool {
        self.state == PanelState::Idle && !self.input.trim().is_empty()
    }

    pub fn can_insert(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingFormula {
                insert: InsertState::Ready,
                ..
            })
        )
    }

    /// The formula currently shown, if any.
    pub fn current_result(&self) -> Option<&FormulaResult> {
        self.pending.as_ref().map(|p| &p.result)
    }

    /// Input edits are dropped while a request is in flight.
    pub fn set_input(&mut self, text: impl Into<String>) -> Vec<Intent> {
        if self.state == PanelState::Submitting {
            return Vec::new();
        }
        self.input = text.into();
        vec![Intent::SetSubmitEnabled(self.can_submit())]
    }

    pub fn submit(&mut self) -> Submission {
        if self.state == PanelState::Submitting {
            debug!("Submit ignored: a request is already in flight");
            return Submission::Ignored;
        }

        let request = match PromptRequest::new(&self.input) {
            Ok(request) => request,
            Err(_) => {
                warn!("Empty prompt provided");
                return Submission::Rejected(vec![Intent::error(MSG_EMPTY_PROMPT)]);
            }
        };

        self.state = PanelState::Submitting;
        Submission::Started {
            request,
            intents: vec![
                Intent::SetSubmitEnabled(false),
                Intent::SetInputEnabled(false),
                Intent::ShowLoading(true),
            ],
        }
    }

    pub fn finish_generate(&mut self, outcome: Result<FormulaResult, PanelError>) -> Vec<Intent> {
        if self.state != PanelState::Submitting {
            warn!("Generation result arrived with no request in flight");
            return Vec::new();
        }
        self.state = PanelState::Idle;

        let mut intents = vec![Intent::ShowLoading(false), Intent::SetInputEnabled(true)];
        match outcome {
            Ok(result) => {
                info!(formula = %result.formula(), "Formula received");
                let prompt = std::mem::take(&mut self.input);
                let prompt = prompt.trim();
                self.history.add(prompt, result.formula(), result.explanation());

                intents.push(Intent::ShowResult {
                    formula: result.formula().to_string(),
                    explanation: result.explanation().to_string(),
                });
                intents.push(Intent::HistoryChanged {
                    count: self.history.len(),
                });
                intents.push(Intent::SetInput(String::new()));
                intents.push(Intent::SetSubmitEnabled(false));
                intents.push(Intent::SetInsertEnabled(true));
                intents.push(Intent::success(MSG_GENERATED));

                self.next_formula_id += 1;
                self.pending = Some(PendingFormula {
                    id: self.next_formula_id,
                    result,
                    insert: InsertState::Ready,
                });
            }
            Err(err) => {
                error!(error = %err, "Formula generation failed");
                intents.push(Intent::SetSubmitEnabled(self.can_submit()));
                intents.push(Intent::error(err.to_string()));
            }
        }
        intents
    }

    /// Starts the one-shot insert of the shown formula.
    pub fn begin_insert(&mut self) -> Result<CellWrite, Vec<Intent>> {
        let config = &self.config;
        match self.pending.as_mut() {
            Some(pending) if pending.insert == InsertState::Ready => {
                pending.insert = InsertState::Writing;
                let formula = pending.result.formula();
                Ok(CellWrite {
                    formula_id: pending.id,
                    formula: formula.to_string(),
                    number_format: number_format_for(formula, config),
                })
            }
            Some(_) => Err(Vec::new()),
            None => Err(vec![Intent::error(MSG_NOTHING_TO_INSERT)]),
        }
    }

    /// Intents to apply right after a successful `begin_insert`.
    pub fn insert_started_intents(&self) -> Vec<Intent> {
        vec![Intent::SetInsertEnabled(false)]
    }

    /// Applies the outcome of the write started for `formula_id`. A result
    /// for a formula that has since been replaced changes nothing.
    pub fn finish_insert(
        &mut self,
        formula_id: u64,
        outcome: Result<String, InsertionError>,
    ) -> Vec<Intent> {
        let pending = match self.pending.as_mut() {
            Some(pending) if pending.id == formula_id && pending.insert == InsertState::Writing => {
                pending
            }
            _ => {
                debug!(formula_id, "Insert result for a replaced formula ignored");
                return Vec::new();
            }
        };

        match outcome {
            Ok(address) => {
                info!(%address, "Formula inserted into cell");
                pending.insert = InsertState::Done;
                vec![Intent::MarkInserted, Intent::success(MSG_INSERTED)]
            }
            Err(err) => {
                error!(error = %err, "Error inserting formula");
                pending.insert = InsertState::Ready;
                vec![
                    Intent::SetInsertEnabled(true),
                    Intent::error(MSG_INSERT_FAILED),
                ]
            }
        }
    }

    /// Copies a past prompt back into the input.
    pub fn reuse_prompt(&mut self, index: usize) -> Vec<Intent> {
        if self.state == PanelState::Submitting {
            return Vec::new();
        }
        let prompt = match self.history.get(index) {
            Some(entry) => entry.prompt.clone(),
            None => return Vec::new(),
        };
        debug!(index, "Reusing prompt");
        self.input = prompt.clone();
        vec![
            Intent::SetInput(prompt),
            Intent::SetSubmitEnabled(self.can_submit()),
        ]
    }

    pub fn clear_history(&mut self) -> Vec<Intent> {
        self.history.clear();
        vec![Intent::HistoryChanged { count: 0 }]
    }
}
