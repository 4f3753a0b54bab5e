use crate::history::HistoryBackend;
use crate::panel::controller::{PanelController, Submission};
use crate::panel::host::HostWorkbook;
use crate::panel::intent::PanelView;
use crate::panel::FormulaGenerator;
use std::cell::{Ref, RefCell};

/// Runs the controller against real collaborators.
///
/// Meant for a single-threaded event loop: actions take `&self` so several
/// can be pending at once, and the controller's state guards decide which of
/// them do anything. No `RefCell` borrow is held across an `.await`.
pub struct Panel<B, G, H, V>
where
    B: HistoryBackend,
    G: FormulaGenerator,
    H: HostWorkbook,
    V: PanelView,
{
    controller: RefCell<PanelController<B>>,
    generator: G,
    host: H,
    view: RefCell<V>,
}

impl<B, G, H, V> Panel<B, G, H, V>
where
    B: HistoryBackend,
    G: FormulaGenerator,
    H: HostWorkbook,
    V: PanelView,
{
    pub fn new(controller: PanelController<B>, generator: G, host: H, mut view: V) -> Self {
        view.apply_all(&controller.initial_intents());
        Self {
            controller: RefCell::new(controller),
            generator,
            host,
            view: RefCell::new(view),
        }
    }

    pub fn set_input(&self, text: &str) {
        let intents = self.controller.borrow_mut().set_input(text);
        self.view.borrow_mut().apply_all(&intents);
    }

    pub async fn generate(&self) {
        let submission = self.controller.borrow_mut().submit();
        let request = match submission {
            Submission::Started { request, intents } => {
                self.view.borrow_mut().apply_all(&intents);
                request
            }
            Submission::Rejected(intents) => {
                self.view.borrow_mut().apply_all(&intents);
                return;
            }
            Submission::Ignored => return,
        };

        let outcome = self.generator.generate(&request).await;

        let intents = self.controller.borrow_mut().finish_generate(outcome);
        self.view.borrow_mut().apply_all(&intents);
    }

    pub async fn insert(&self) {
        let begun = self.controller.borrow_mut().begin_insert();
        let write = match begun {
            Ok(write) => {
                let intents = self.controller.borrow().insert_started_intents();
                self.view.borrow_mut().apply_all(&intents);
                write
            }
            Err(intents) => {
                self.view.borrow_mut().apply_all(&intents);
                return;
            }
        };

        let outcome = self.host.write_active_cell(&write).await;

        let intents = self.controller.borrow_mut().finish_insert(write.formula_id, outcome);
        self.view.borrow_mut().apply_all(&intents);
    }

    pub fn reuse_prompt(&self, index: usize) {
        let intents = self.controller.borrow_mut().reuse_prompt(index);
        self.view.borrow_mut().apply_all(&intents);
    }

    pub fn clear_history(&self) {
        let intents = self.controller.borrow_mut().clear_history();
        self.view.borrow_mut().apply_all(&intents);
    }

    pub fn controller(&self) -> Ref<'_, PanelController<B>> {
        self.controller.borrow()
    }

    pub fn view(&self) -> Ref<'_, V> {
        self.view.borrow()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}
