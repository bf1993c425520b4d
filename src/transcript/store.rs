//! Transcript store — id-keyed, append-and-amend conversation log.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::model::{EntryId, TranscriptEntry};

struct Inner {
    entries: HashMap<EntryId, TranscriptEntry>,
    /// Append order. Entries are never reordered or removed.
    order: Vec<EntryId>,
}

/// The single source of truth for everything the user sees.
///
/// Entries are addressed by id so a running batch can keep amending its
/// target while unrelated entries are appended behind it.
pub struct TranscriptStore {
    inner: RwLock<Inner>,
}

impl TranscriptStore {
    /// Create a new, empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                order: Vec::new(),
            }),
        })
    }

    /// Append an entry, returning its id.
    pub async fn append(&self, entry: TranscriptEntry) -> EntryId {
        let id = entry.id;
        debug!(entry_id = %id, source = ?entry.source, "Transcript entry appended");

        let mut inner = self.inner.write().await;
        inner.order.push(id);
        inner.entries.insert(id, entry);
        id
    }

    /// Amend an entry in place. Returns `false` when the id is unknown;
    /// that is a programming error, logged but never fatal.
    pub async fn amend<F>(&self, id: EntryId, mutate: F) -> bool
    where
        F: FnOnce(&mut TranscriptEntry),
    {
        let mut inner = self.inner.write().await;
        match inner.entries.get_mut(&id) {
            Some(entry) => {
                mutate(entry);
                true
            }
            None => {
                warn!(entry_id = %id, "Amend targeted an unknown transcript entry");
                false
            }
        }
    }

    /// Get a snapshot of one entry.
    pub async fn get(&self, id: EntryId) -> Option<TranscriptEntry> {
        self.inner.read().await.entries.get(&id).cloned()
    }

    /// Snapshot of all entries in append order, for rendering. The store
    /// never filters or transforms entries; display logic is a collaborator.
    pub async fn entries(&self) -> Vec<TranscriptEntry> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.entries.get(id).cloned())
            .collect()
    }

    /// Number of entries in the transcript.
    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::model::{Payload, WorkflowKind};

    #[tokio::test]
    async fn append_preserves_order() {
        let store = TranscriptStore::new();
        store.append(TranscriptEntry::user("first")).await;
        store.append(TranscriptEntry::system("second")).await;
        store.append(TranscriptEntry::user("third")).await;

        let entries = store.entries().await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].text, "first");
        assert_eq!(entries[1].text, "second");
        assert_eq!(entries[2].text, "third");
    }

    #[tokio::test]
    async fn amend_mutates_in_place() {
        let store = TranscriptStore::new();
        let id = store
            .append(TranscriptEntry::assistant(
                WorkflowKind::SummarizeEmail,
                "Summarizing (0/2)",
            ))
            .await;

        let amended = store
            .amend(id, |entry| {
                entry.text = "Summarizing (1/2)".into();
            })
            .await;
        assert!(amended);

        let entry = store.get(id).await.unwrap();
        assert_eq!(entry.text, "Summarizing (1/2)");
        // Ordering and count untouched
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn amend_unknown_id_is_noop() {
        let store = TranscriptStore::new();
        store.append(TranscriptEntry::user("hello")).await;

        let amended = store
            .amend(EntryId::new(), |entry| {
                entry.text = "should not happen".into();
            })
            .await;
        assert!(!amended);

        let entries = store.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "hello");
    }

    #[tokio::test]
    async fn amend_targets_by_id_not_position() {
        let store = TranscriptStore::new();
        let target = store
            .append(TranscriptEntry::assistant(
                WorkflowKind::CalendarEvent,
                "Detecting (0/3)",
            ))
            .await;
        // Unrelated entry appended after the batch target
        store.append(TranscriptEntry::system("unrelated notice")).await;

        store
            .amend(target, |entry| entry.text = "Detecting (1/3)".into())
            .await;

        let entries = store.entries().await;
        assert_eq!(entries[0].text, "Detecting (1/3)");
        assert_eq!(entries[1].text, "unrelated notice");
    }

    #[tokio::test]
    async fn reamending_same_snapshot_is_idempotent() {
        let store = TranscriptStore::new();
        let id = store
            .append(TranscriptEntry::assistant(
                WorkflowKind::GenerateLabels,
                "Labeling (0/1)",
            ))
            .await;

        let snapshot = Payload::Labels(vec![crate::transcript::model::LabelSet::normalized(
            "e1",
            vec!["work".into()],
        )]);

        for _ in 0..2 {
            let snapshot = snapshot.clone();
            store
                .amend(id, |entry| {
                    entry.text = "Labeling (1/1)".into();
                    entry.payload = snapshot;
                })
                .await;
        }

        let entry = store.get(id).await.unwrap();
        assert_eq!(entry.text, "Labeling (1/1)");
        assert_eq!(entry.payload.len(), 1);
    }
}
