pub mod conversation;
pub mod domain;
pub mod pdf;
pub mod ports;
pub mod transcript;
pub mod tray;

pub use conversation::{
    ConfirmOutcome, Conversation, FollowUpPolicy, SendOutcome, APOLOGY_TEXT, DEFAULT_GREETING,
};
pub use domain::{BotTurnKind, PdfArtifact, StagedFile, Turn, TurnDetail, TurnId};
pub use pdf::{decode_artifacts, DecodeFailure, DecodedArtifacts};
pub use ports::{BackendService, ChatReply, PdfPayload, PortError, PortResult};
pub use transcript::Transcript;
pub use tray::AttachmentTray;
