//! crates/dispute_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the conversation core.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete HTTP client that reaches the backend.

use async_trait::async_trait;

use crate::domain::StagedFile;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The backend could not be reached, or answered with a non-success status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A document payload could not be decoded. Scoped to one entry; the
    /// decoder records it and carries on with the siblings.
    #[error("could not decode '{filename}': {reason}")]
    Decode { filename: String, reason: String },

    /// A request rejected at the boundary before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Backend Reply Shapes
//=========================================================================================

/// One generated document as delivered by the backend, still encoded.
#[derive(Debug, Clone)]
pub struct PdfPayload {
    pub filename: String,
    pub pdf_base64: String,
}

/// The backend's answer to one chat turn.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    /// Whether the reply is a report draft awaiting user confirmation.
    pub is_report: bool,
    pub pdfs: Vec<PdfPayload>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The backend collaborator driving the conversation.
///
/// One method per call in the HTTP contract. None of them retry; a failed
/// call surfaces as `PortError::Transport` and the caller degrades it to a
/// visible chat message.
#[async_trait]
pub trait BackendService: Send + Sync {
    /// Sends one user message and returns the assistant's reply.
    async fn send_chat(&self, message: &str) -> PortResult<ChatReply>;

    /// Uploads the staged files in a single request. Only success or
    /// failure matters to the caller; there is no payload to interpret.
    async fn upload_files(&self, files: Vec<StagedFile>) -> PortResult<()>;

    /// Records the user's decision on the pending report draft.
    async fn confirm_report(&self, confirmed: bool) -> PortResult<String>;

    /// Runs the post-confirmation follow-up exchange, carrying the most
    /// recent assistant reply as context.
    async fn after_report(&self, message: &str) -> PortResult<String>;
}
