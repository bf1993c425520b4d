//! Conversation transcript — model types and the append-and-amend store.

pub mod model;
pub mod store;

pub use model::{
    DetectedEvent, EmailSummary, EntryId, LabelSet, Payload, Source, TranscriptEntry, WorkflowKind,
};
pub use store::TranscriptStore;
