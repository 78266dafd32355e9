//! crates/dispute_assistant_core/src/pdf.rs
//!
//! Decodes backend-supplied base64 PDF payloads into binary handles.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use tracing::warn;

use crate::domain::PdfArtifact;
use crate::ports::{PdfPayload, PortError, PortResult};

/// One payload that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub filename: String,
    pub reason: String,
}

/// The outcome of decoding a batch of payloads: every well-formed entry
/// as a ready artifact, every malformed entry as a recorded failure.
#[derive(Debug, Default)]
pub struct DecodedArtifacts {
    pub artifacts: Vec<PdfArtifact>,
    pub failures: Vec<DecodeFailure>,
}

/// Decodes each payload independently, in order.
///
/// A malformed entry never hides its siblings: it becomes a
/// `DecodeFailure` and decoding continues. Pure apart from the warning
/// log per failed entry.
pub fn decode_artifacts(payloads: Vec<PdfPayload>) -> DecodedArtifacts {
    let mut decoded = DecodedArtifacts::default();
    for payload in payloads {
        let filename = payload.filename.clone();
        match decode_entry(payload) {
            Ok(artifact) => decoded.artifacts.push(artifact),
            Err(e) => {
                warn!(error = %e, "discarding undecodable document payload");
                let reason = match e {
                    PortError::Decode { reason, .. } => reason,
                    other => other.to_string(),
                };
                decoded.failures.push(DecodeFailure { filename, reason });
            }
        }
    }
    decoded
}

fn decode_entry(payload: PdfPayload) -> PortResult<PdfArtifact> {
    let raw = STANDARD
        .decode(payload.pdf_base64.as_bytes())
        .map_err(|e| PortError::Decode {
            filename: payload.filename.clone(),
            reason: e.to_string(),
        })?;
    Ok(PdfArtifact {
        filename: payload.filename,
        bytes: Bytes::from(raw),
    })
}
