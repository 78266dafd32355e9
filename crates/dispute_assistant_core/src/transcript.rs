//! crates/dispute_assistant_core/src/transcript.rs
//!
//! The append-only transcript: the single source of truth for what the
//! front end renders.

use chrono::Utc;

use crate::domain::{BotTurnKind, PdfArtifact, Turn, TurnDetail, TurnId};

/// Ordered sequence of turns plus the id counter.
///
/// Ids are handed out here and nowhere else, so they stay strictly
/// increasing no matter how callers interleave appends. The only permitted
/// mutation of an existing turn is the one-way `confirmed` flip.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> TurnId {
        self.next_id += 1;
        TurnId(self.next_id)
    }

    /// Appends a user turn and returns its id.
    pub fn append_user(&mut self, text: String, attachments: Vec<String>) -> TurnId {
        let id = self.allocate_id();
        self.turns.push(Turn {
            id,
            timestamp: Utc::now(),
            text,
            detail: TurnDetail::User { attachments },
        });
        id
    }

    /// Appends a bot turn and returns its id.
    pub fn append_bot(
        &mut self,
        text: String,
        kind: BotTurnKind,
        artifacts: Vec<PdfArtifact>,
    ) -> TurnId {
        let id = self.allocate_id();
        self.turns.push(Turn {
            id,
            timestamp: Utc::now(),
            text,
            detail: TurnDetail::Bot { kind, artifacts },
        });
        id
    }

    /// Flips `confirmed` on the matching report draft.
    ///
    /// Returns `false` without touching anything when the id is unknown,
    /// names a turn that is not a report draft, or names a draft whose
    /// decision was already recorded. The flag never reverts.
    pub fn mark_confirmed(&mut self, id: TurnId) -> bool {
        let Some(turn) = self.turns.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        match &mut turn.detail {
            TurnDetail::Bot {
                kind: BotTurnKind::ReportDraft { confirmed },
                ..
            } if !*confirmed => {
                *confirmed = true;
                true
            }
            _ => false,
        }
    }

    /// The full ordered sequence. Callers treat this as an immutable
    /// snapshot per render.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn get(&self, id: TurnId) -> Option<&Turn> {
        self.turns.iter().find(|t| t.id == id)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_strictly_in_append_order() {
        let mut transcript = Transcript::new();
        let a = transcript.append_user("one".into(), Vec::new());
        let b = transcript.append_bot("two".into(), BotTurnKind::Plain, Vec::new());
        let c = transcript.append_user("three".into(), Vec::new());
        assert!(a < b && b < c);
        assert_eq!(transcript.len(), 3);
        let ids: Vec<_> = transcript.turns().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn mark_confirmed_flips_exactly_once() {
        let mut transcript = Transcript::new();
        let draft = transcript.append_bot(
            "report".into(),
            BotTurnKind::ReportDraft { confirmed: false },
            Vec::new(),
        );
        assert!(transcript.mark_confirmed(draft));
        assert!(!transcript.mark_confirmed(draft));
        assert!(matches!(
            transcript.get(draft).unwrap().detail,
            TurnDetail::Bot {
                kind: BotTurnKind::ReportDraft { confirmed: true },
                ..
            }
        ));
    }

    #[test]
    fn mark_confirmed_ignores_non_drafts_and_unknown_ids() {
        let mut transcript = Transcript::new();
        let plain = transcript.append_bot("hi".into(), BotTurnKind::Plain, Vec::new());
        let user = transcript.append_user("hello".into(), Vec::new());
        assert!(!transcript.mark_confirmed(plain));
        assert!(!transcript.mark_confirmed(user));
        assert!(!transcript.mark_confirmed(TurnId(999)));
        assert_eq!(transcript.len(), 2);
    }
}
