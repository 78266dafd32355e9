//! services/client/src/render.rs
//!
//! Turns transcript entries into terminal output. This is the product
//! surface, so it writes to stdout directly rather than through tracing.

use dispute_assistant_core::{BotTurnKind, Turn, TurnDetail};

/// Prints one transcript turn.
pub fn print_turn(turn: &Turn) {
    let stamp = turn.timestamp.format("%H:%M");
    match &turn.detail {
        TurnDetail::User { attachments } => {
            println!("\n[{stamp}] you: {}", turn.text);
            if !attachments.is_empty() {
                println!("        attached: {}", attachments.join(", "));
            }
        }
        TurnDetail::Bot { kind, artifacts } => {
            let tag = match kind {
                BotTurnKind::Plain => "assistant",
                BotTurnKind::ReportDraft { .. } => "assistant [report draft]",
                BotTurnKind::Failure => "assistant [error]",
            };
            println!("\n[{stamp}] {tag}: {}", turn.text);
            for artifact in artifacts {
                println!("        document: {}", artifact.filename);
            }
            if turn.is_open_draft() {
                println!(
                    "        review the draft, then /confirm {} to submit it or /revise {} to request changes",
                    turn.id, turn.id
                );
            }
        }
    }
}

/// Prints the staged-attachment listing used by `/staged` and `/attach`.
pub fn print_staged(names: &[String]) {
    if names.is_empty() {
        println!("nothing staged");
        return;
    }
    for (i, name) in names.iter().enumerate() {
        println!("{}. {}", i + 1, name);
    }
}
