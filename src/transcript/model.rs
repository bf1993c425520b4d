//! Transcript model — entries, workflow kinds, and per-email result payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback label applied when the backend returns no labels for an email.
const DEFAULT_LABEL: &str = "general";

/// Identity handle for a transcript entry.
///
/// Batch workflows amend their target entry through this id, never by
/// position, so amendment stays correct even if other entries are appended
/// while a batch is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    User,
    Assistant,
    System,
}

/// Workflow category assigned by the backend's classification response.
///
/// Never inferred locally from the user's text. The serde names match the
/// backend's `type` field on the classify response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    #[serde(rename = "message")]
    PlainMessage,
    CalendarEvent,
    SummarizeEmail,
    GenerateLabels,
}

impl WorkflowKind {
    /// Whether this kind triggers a per-email batch after classification.
    pub fn requires_batch(&self) -> bool {
        !matches!(self, Self::PlainMessage)
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PlainMessage => "message",
            Self::CalendarEvent => "calendar_event",
            Self::SummarizeEmail => "summarize_email",
            Self::GenerateLabels => "generate_labels",
        };
        write!(f, "{s}")
    }
}

/// A calendar event detected in one email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedEvent {
    pub email_id: String,
    pub event: String,
    /// ISO-8601 timestamp; the backend omits it when it cannot parse one.
    pub datetime: Option<String>,
}

/// An AI-generated summary of one email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSummary {
    pub email_id: String,
    pub response: String,
}

/// Labels assigned to one email. Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    pub email_id: String,
    pub labels: Vec<String>,
}

impl LabelSet {
    /// Build a label set, substituting the default label for an empty list.
    ///
    /// An empty backend result is a valid "nothing specific" answer, not an
    /// error; normalization happens here, before accumulation.
    pub fn normalized(email_id: impl Into<String>, labels: Vec<String>) -> Self {
        let labels = if labels.is_empty() {
            vec![DEFAULT_LABEL.to_string()]
        } else {
            labels
        };
        Self {
            email_id: email_id.into(),
            labels,
        }
    }
}

/// Structured results attached to a transcript entry. The variant matches
/// the entry's `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Plain,
    Events(Vec<DetectedEvent>),
    Summaries(Vec<EmailSummary>),
    Labels(Vec<LabelSet>),
}

impl Payload {
    /// The empty accumulator for a workflow kind.
    pub fn empty_for(kind: WorkflowKind) -> Self {
        match kind {
            WorkflowKind::PlainMessage => Self::Plain,
            WorkflowKind::CalendarEvent => Self::Events(Vec::new()),
            WorkflowKind::SummarizeEmail => Self::Summaries(Vec::new()),
            WorkflowKind::GenerateLabels => Self::Labels(Vec::new()),
        }
    }

    /// Number of accumulated items. Zero for plain entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Plain => 0,
            Self::Events(v) => v.len(),
            Self::Summaries(v) => v.len(),
            Self::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry in the conversation transcript.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub source: Source,
    pub kind: WorkflowKind,
    /// Display text; rewritten in place as a batch workflow advances.
    pub text: String,
    /// Set at creation, refreshed on every amendment.
    pub timestamp: DateTime<Utc>,
    pub payload: Payload,
}

impl TranscriptEntry {
    fn new(source: Source, kind: WorkflowKind, text: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            source,
            kind,
            text: text.into(),
            timestamp: Utc::now(),
            payload: Payload::empty_for(kind),
        }
    }

    /// A user-submitted message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Source::User, WorkflowKind::PlainMessage, text)
    }

    /// An assistant entry for a classified response. The payload starts
    /// empty in the variant matching `kind`.
    pub fn assistant(kind: WorkflowKind, text: impl Into<String>) -> Self {
        Self::new(Source::Assistant, kind, text)
    }

    /// A system notice (welcome message, error report).
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Source::System, WorkflowKind::PlainMessage, text)
    }
}
