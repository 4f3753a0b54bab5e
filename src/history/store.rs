use crate::history::backend::HistoryBackend;
use crate::history::entry::HistoryEntry;
use tracing::{debug, error, warn};

/// Storage key of the serialized list.
pub const HISTORY_KEY: &str = "xslgpt_prompt_history";
pub const HISTORY_LIMIT: usize = 10;

pub struct PromptHistoryStore<B: HistoryBackend> {
    backend: B,
    entries: Vec<HistoryEntry>,
}

impl<B: HistoryBackend> PromptHistoryStore<B> {
    /// Opens the store, loading whatever the backend holds. Unreadable data
    /// yields an empty list.
    pub fn open(backend: B) -> Self {
        let entries = load_entries(&backend);
        Self { backend, entries }
    }

    pub fn add(
        &mut self,
        prompt: impl Into<String>,
        formula: impl Into<String>,
        explanation: impl Into<String>,
    ) -> &HistoryEntry {
        self.add_entry(HistoryEntry::new(prompt, formula, explanation))
    }

    /// Prepends `entry`, evicts past the limit, then persists. A persistence
    /// failure is logged and the in-memory list is kept.
    pub fn add_entry(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
        self.persist();
        &self.entries[0]
    }

    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.backend.remove(HISTORY_KEY) {
            error!(error = %e, "Error clearing prompt history");
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Error serializing prompt history");
                return;
            }
        };
        match self.backend.save(HISTORY_KEY, &raw) {
            Ok(()) => debug!(entries = self.entries.len(), "Prompt history saved"),
            Err(e) => error!(error = %e, "Error saving prompt history"),
        }
    }
}

fn load_entries<B: HistoryBackend>(backend: &B) -> Vec<HistoryEntry> {
    let raw = match backend.load(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            error!(error = %e, "Error loading prompt history");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
        Ok(mut entries) => {
            entries.truncate(HISTORY_LIMIT);
            entries
        }
        Err(e) => {
            warn!(error = %e, "Discarding unreadable prompt history");
            Vec::new()
        }
    }
}
