//! crates/dispute_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the conversation.
//! These structs are independent of any transport or serialization format.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Identifier of one turn within a conversation.
///
/// Allocated only by the transcript; strictly increasing, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One message unit in the conversation, authored by either the user or
/// the backend-driven assistant.
#[derive(Debug, Clone)]
pub struct Turn {
    pub id: TurnId,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub detail: TurnDetail,
}

/// Sender-specific payload of a turn.
///
/// A user turn can only carry attachment names; a bot turn can only carry
/// a kind tag and decoded document artifacts. States like "a user turn
/// with a confirmed flag" are unrepresentable.
#[derive(Debug, Clone)]
pub enum TurnDetail {
    User {
        /// Names of the files uploaded alongside this message, in
        /// selection order. The bytes are not retained after upload.
        attachments: Vec<String>,
    },
    Bot {
        kind: BotTurnKind,
        /// Generated documents delivered with this reply, already decoded.
        artifacts: Vec<PdfArtifact>,
    },
}

/// What a bot turn represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotTurnKind {
    /// An ordinary reply.
    Plain,
    /// A generated report summary awaiting the user's decision.
    ///
    /// `confirmed` starts `false` and flips to `true` exactly once, when
    /// the user records a decision (either confirm or request revision).
    ReportDraft { confirmed: bool },
    /// A synthesized stand-in for a reply that never arrived.
    Failure,
}

/// A binary document delivered alongside a bot turn.
///
/// `Bytes` is the binary handle: cloning it for preview or download is
/// cheap, and the underlying allocation is released once the transcript
/// and every outstanding clone have dropped it.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub filename: String,
    pub bytes: Bytes,
}

/// A file selected by the user but not yet transmitted.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub bytes: Bytes,
}

impl Turn {
    /// Whether this turn is a report draft still awaiting a decision.
    pub fn is_open_draft(&self) -> bool {
        matches!(
            self.detail,
            TurnDetail::Bot {
                kind: BotTurnKind::ReportDraft { confirmed: false },
                ..
            }
        )
    }

    /// Whether this turn was authored by the user.
    pub fn is_user(&self) -> bool {
        matches!(self.detail, TurnDetail::User { .. })
    }
}
