//! crates/dispute_assistant_core/src/conversation.rs
//!
//! The conversation service: validates and dispatches user sends, and
//! drives the report confirmation exchange. All state lives here and is
//! mutated through `&mut self`, so two dispatches can never overlap.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{BotTurnKind, StagedFile, TurnId};
use crate::pdf;
use crate::ports::BackendService;
use crate::transcript::Transcript;
use crate::tray::AttachmentTray;

/// The fixed text shown in place of any reply that never arrived. No
/// error detail is surfaced to the user.
pub const APOLOGY_TEXT: &str =
    "Sorry, something went wrong on our end. Please try again in a moment.";

/// The assistant's opening message, seeded locally before any backend call.
pub const DEFAULT_GREETING: &str = "Hello! I'm your B.C. Employment Rights Assistant. \
    I'm here to help you understand your workplace rights under British Columbia law. \
    I'll ask you some questions about your situation to provide accurate guidance. \
    What brings you here today?";

/// Whether the post-confirmation follow-up runs after a failed
/// confirm-report call.
///
/// The observed behavior advances whenever the decision was "confirm",
/// even when the confirm call itself failed; whether that is intended is
/// an open product question, so both readings are selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowUpPolicy {
    /// Always run the follow-up after a confirming decision.
    #[default]
    Always,
    /// Run it only when the confirm call returned a reply.
    AfterConfirmSuccess,
}

/// What happened to one send action.
#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The user turn went out and a bot turn (reply or apology) came back.
    Dispatched { user_turn: TurnId, bot_turn: TurnId },
    /// The attachment upload failed, so the send was aborted: no user
    /// turn, tray untouched, one synthesized failure turn.
    UploadFailed { failure_turn: TurnId },
    /// Empty text with nothing staged; nothing was appended.
    RejectedEmpty,
    /// A dispatch was already in flight; nothing was appended.
    RejectedBusy,
}

/// What happened to one confirmation action.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Completed {
        confirm_turn: TurnId,
        follow_up_turn: Option<TurnId>,
    },
    /// The turn is not an open report draft (unknown id, wrong kind, or
    /// decision already recorded). Nothing changed.
    Rejected,
}

/// One client-held, ephemeral conversation.
pub struct Conversation {
    id: Uuid,
    backend: Arc<dyn BackendService>,
    transcript: Transcript,
    tray: AttachmentTray,
    busy: bool,
    /// Most recent backend-produced reply text, carried as context by the
    /// post-confirmation follow-up call.
    last_reply: Option<String>,
    policy: FollowUpPolicy,
}

impl Conversation {
    /// Starts a conversation, seeding the transcript with the assistant's
    /// greeting. The greeting is local only; no backend call is made.
    pub fn new(backend: Arc<dyn BackendService>, policy: FollowUpPolicy, greeting: &str) -> Self {
        let mut transcript = Transcript::new();
        transcript.append_bot(greeting.to_string(), BotTurnKind::Plain, Vec::new());
        Self {
            id: Uuid::new_v4(),
            backend,
            transcript,
            tray: AttachmentTray::new(),
            busy: false,
            last_reply: None,
            policy,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Stages a selected file for the next send.
    pub fn stage_attachment(&mut self, file: StagedFile) {
        info!(conversation = %self.id, file = %file.name, "attachment staged");
        self.tray.stage(file);
    }

    /// Removes the staged file at `index` (staging order).
    pub fn unstage_attachment(&mut self, index: usize) -> Option<StagedFile> {
        self.tray.unstage(index)
    }

    pub fn staged_names(&self) -> Vec<String> {
        self.tray.names()
    }

    /// One full send action: upload staged files, append the user turn,
    /// run the chat round trip, append the bot turn.
    ///
    /// Empty input with nothing staged is rejected before any effect, as
    /// is a send arriving while another is in flight.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let trimmed = text.trim();
        if self.busy {
            warn!(conversation = %self.id, "send rejected: dispatch already in flight");
            return SendOutcome::RejectedBusy;
        }
        if trimmed.is_empty() && self.tray.is_empty() {
            return SendOutcome::RejectedEmpty;
        }
        self.busy = true;
        let outcome = self.dispatch(trimmed).await;
        self.busy = false;
        outcome
    }

    async fn dispatch(&mut self, trimmed: &str) -> SendOutcome {
        let attachment_names = self.tray.names();
        if !self.tray.is_empty() {
            let files = self.tray.files().to_vec();
            if let Err(e) = self.backend.upload_files(files).await {
                error!(conversation = %self.id, error = %e, "attachment upload failed; send aborted");
                let failure_turn = self.transcript.append_bot(
                    APOLOGY_TEXT.to_string(),
                    BotTurnKind::Failure,
                    Vec::new(),
                );
                return SendOutcome::UploadFailed { failure_turn };
            }
            self.tray.take_all();
        }

        let outgoing = compose_outgoing(trimmed, &attachment_names);
        let user_turn = self.transcript.append_user(outgoing.clone(), attachment_names);
        info!(conversation = %self.id, turn = %user_turn, "user turn dispatched");

        let bot_turn = match self.backend.send_chat(&outgoing).await {
            Ok(reply) => {
                let decoded = pdf::decode_artifacts(reply.pdfs);
                if !decoded.failures.is_empty() {
                    warn!(
                        conversation = %self.id,
                        dropped = decoded.failures.len(),
                        "some document payloads could not be decoded"
                    );
                }
                let kind = if reply.is_report {
                    BotTurnKind::ReportDraft { confirmed: false }
                } else {
                    BotTurnKind::Plain
                };
                self.last_reply = Some(reply.reply.clone());
                self.transcript
                    .append_bot(reply.reply, kind, decoded.artifacts)
            }
            Err(e) => {
                error!(conversation = %self.id, error = %e, "chat call failed");
                self.transcript
                    .append_bot(APOLOGY_TEXT.to_string(), BotTurnKind::Failure, Vec::new())
            }
        };
        SendOutcome::Dispatched { user_turn, bot_turn }
    }

    /// Records the user's decision on the report draft `id`.
    ///
    /// The `confirmed` flag flips before any network call returns, so a
    /// second decision on the same draft is rejected even while the first
    /// is still settling. The flag can therefore read `true` locally
    /// before the backend has actually recorded the decision.
    pub async fn confirm(&mut self, id: TurnId, decision: bool) -> ConfirmOutcome {
        if !self.transcript.mark_confirmed(id) {
            warn!(conversation = %self.id, turn = %id, "confirmation rejected: not an open report draft");
            return ConfirmOutcome::Rejected;
        }
        info!(conversation = %self.id, turn = %id, decision, "report decision recorded");

        let (confirm_turn, confirm_ok) = match self.backend.confirm_report(decision).await {
            Ok(reply) => {
                self.last_reply = Some(reply.clone());
                let turn = self
                    .transcript
                    .append_bot(reply, BotTurnKind::Plain, Vec::new());
                (turn, true)
            }
            Err(e) => {
                error!(conversation = %self.id, error = %e, "confirm-report call failed");
                let turn = self.transcript.append_bot(
                    APOLOGY_TEXT.to_string(),
                    BotTurnKind::Failure,
                    Vec::new(),
                );
                (turn, false)
            }
        };

        let follow_up_turn = if decision && self.follow_up_allowed(confirm_ok) {
            let context = self.last_reply.clone().unwrap_or_default();
            let turn = match self.backend.after_report(&context).await {
                Ok(reply) => {
                    self.last_reply = Some(reply.clone());
                    self.transcript
                        .append_bot(reply, BotTurnKind::Plain, Vec::new())
                }
                Err(e) => {
                    error!(conversation = %self.id, error = %e, "after-report call failed");
                    self.transcript.append_bot(
                        APOLOGY_TEXT.to_string(),
                        BotTurnKind::Failure,
                        Vec::new(),
                    )
                }
            };
            Some(turn)
        } else {
            None
        };

        ConfirmOutcome::Completed {
            confirm_turn,
            follow_up_turn,
        }
    }

    fn follow_up_allowed(&self, confirm_ok: bool) -> bool {
        match self.policy {
            FollowUpPolicy::Always => true,
            FollowUpPolicy::AfterConfirmSuccess => confirm_ok,
        }
    }
}

/// Builds the outgoing message text: the trimmed user text plus, when
/// attachments exist, a human-readable note naming them. The backend sees
/// attachment names only through this prose, never as structured metadata.
fn compose_outgoing(text: &str, attachment_names: &[String]) -> String {
    if attachment_names.is_empty() {
        return text.to_string();
    }
    let note = format!("User added {}", attachment_names.join(", "));
    if text.is_empty() {
        note
    } else {
        format!("{text}\n\n{note}")
    }
}
