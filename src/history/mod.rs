//! Recent prompts, newest first, capped at [`HISTORY_LIMIT`].
//! Persisted best-effort through a pluggable key/value backend.

pub mod backend;
pub mod entry;
pub mod store;

#[cfg(test)]
mod tests;

pub use backend::{BackendError, FileBackend, HistoryBackend, MemoryBackend};
pub use entry::HistoryEntry;
pub use store::{PromptHistoryStore, HISTORY_KEY, HISTORY_LIMIT};
