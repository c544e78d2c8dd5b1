use crate::types::EntryId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// System status line (camera errors, recording failures, readiness).
    Status,
    /// A description returned by the service.
    Ai,
    /// A follow-up question echoed back before its request goes out.
    User,
    /// Placeholder for a request (or recording) still in progress.
    /// Removed exactly once, by its own resolution or failure.
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub text: String,
}

/// Append-only ordered record of everything shown (and spoken) to the user.
///
/// Entries keep the order their triggering events completed in. The only
/// mutation besides appending is removing a `Loading` entry by id once the
/// work it stood for has resolved or failed.
#[derive(Debug, Default)]
pub struct TranscriptLog {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: EntryKind, text: impl Into<String>) -> EntryId {
        let id = EntryId::new();
        self.entries.push(TranscriptEntry {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    /// Removes the `Loading` entry with the given id.
    ///
    /// Returns whether an entry was removed; a second resolution of the same
    /// id is a no-op, which keeps late duplicates harmless.
    pub fn resolve_loading(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.id == id && e.kind == EntryKind::Loading));
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_append_order() {
        let mut log = TranscriptLog::new();
        log.push(EntryKind::Status, "ready");
        log.push(EntryKind::User, "what is this?");
        log.push(EntryKind::Ai, "a mug");

        let kinds: Vec<EntryKind> = log.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EntryKind::Status, EntryKind::User, EntryKind::Ai]);
    }

    #[test]
    fn resolve_loading_removes_exactly_that_entry() {
        let mut log = TranscriptLog::new();
        let first = log.push(EntryKind::Loading, "Analyzing image...");
        let second = log.push(EntryKind::Loading, "Thinking...");

        assert!(log.resolve_loading(first));
        let remaining: Vec<EntryId> = log.entries().iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![second]);
    }

    #[test]
    fn resolve_loading_twice_is_a_noop() {
        let mut log = TranscriptLog::new();
        let id = log.push(EntryKind::Loading, "Thinking...");
        assert!(log.resolve_loading(id));
        assert!(!log.resolve_loading(id));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn resolve_loading_never_touches_other_kinds() {
        let mut log = TranscriptLog::new();
        let id = log.push(EntryKind::Status, "ready");
        assert!(!log.resolve_loading(id));
        assert_eq!(log.entries().len(), 1);
    }
}
