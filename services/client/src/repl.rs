//! services/client/src/repl.rs
//!
//! The interactive terminal loop: reads user input line by line, feeds it
//! to the conversation, and prints every turn the conversation appends.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use dispute_assistant_core::{
    ConfirmOutcome, Conversation, PdfArtifact, SendOutcome, StagedFile, Turn, TurnDetail, TurnId,
};
use tokio::io::AsyncBufReadExt;
use tracing::warn;

use crate::error::AppError;
use crate::render;

const HELP_TEXT: &str = "\
commands:
  /attach <path>   stage a file for the next message
  /detach <n>      remove staged file n (see /staged)
  /staged          list staged files
  /confirm <id>    submit the report draft with that turn id
  /revise <id>     ask for changes to the report draft instead
  /quit            leave the conversation";

/// The interactive front end around one conversation.
pub struct Repl {
    conversation: Conversation,
    download_dir: PathBuf,
    rendered: usize,
}

impl Repl {
    pub fn new(conversation: Conversation, download_dir: PathBuf) -> Self {
        Self {
            conversation,
            download_dir,
            rendered: 0,
        }
    }

    /// Runs until the user quits or stdin closes.
    pub async fn run(mut self) -> Result<(), AppError> {
        println!("Type a message and press Enter. /help lists commands.");
        self.flush_new_turns().await;

        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("\n> ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if let Some(command) = line.strip_prefix('/') {
                if !self.handle_command(command).await {
                    break;
                }
            } else {
                self.handle_send(&line).await;
            }
            self.flush_new_turns().await;
        }
        Ok(())
    }

    async fn handle_send(&mut self, text: &str) {
        match self.conversation.send(text).await {
            SendOutcome::Dispatched { .. } | SendOutcome::UploadFailed { .. } => {}
            SendOutcome::RejectedEmpty => println!("nothing to send"),
            SendOutcome::RejectedBusy => println!("still waiting on the previous message"),
        }
    }

    /// Returns `false` when the loop should stop.
    async fn handle_command(&mut self, command: &str) -> bool {
        let (name, arg) = match command.split_once(' ') {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "quit" | "exit" => return false,
            "help" => println!("{HELP_TEXT}"),
            "attach" => self.attach(arg).await,
            "detach" => match arg.parse::<usize>() {
                Ok(n) if n >= 1 => match self.conversation.unstage_attachment(n - 1) {
                    Some(file) => println!("removed {}", file.name),
                    None => println!("no staged file {n}"),
                },
                _ => println!("usage: /detach <n>"),
            },
            "staged" => render::print_staged(&self.conversation.staged_names()),
            "confirm" => self.decide(arg, true).await,
            "revise" => self.decide(arg, false).await,
            other => println!("unknown command '/{other}'; /help lists commands"),
        }
        true
    }

    async fn attach(&mut self, path: &str) {
        if path.is_empty() {
            println!("usage: /attach <path>");
            return;
        }
        match tokio::fs::read(path).await {
            Ok(data) => {
                let name = Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string());
                self.conversation.stage_attachment(StagedFile {
                    name,
                    bytes: Bytes::from(data),
                });
                render::print_staged(&self.conversation.staged_names());
            }
            Err(e) => println!("could not read {path}: {e}"),
        }
    }

    async fn decide(&mut self, arg: &str, decision: bool) {
        let Ok(raw) = arg.parse::<u64>() else {
            println!("usage: /{} <turn id>", if decision { "confirm" } else { "revise" });
            return;
        };
        match self.conversation.confirm(TurnId(raw), decision).await {
            ConfirmOutcome::Completed { .. } => {}
            ConfirmOutcome::Rejected => println!("turn {raw} is not awaiting a decision"),
        }
    }

    /// Prints every turn appended since the last flush, writing any
    /// delivered documents into the download directory as they appear.
    async fn flush_new_turns(&mut self) {
        let turns: Vec<Turn> = self.conversation.transcript().turns()[self.rendered..].to_vec();
        self.rendered = self.conversation.transcript().len();
        for turn in &turns {
            render::print_turn(turn);
            if let TurnDetail::Bot { artifacts, .. } = &turn.detail {
                for artifact in artifacts {
                    match save_artifact(&self.download_dir, artifact).await {
                        Ok(path) => println!("        saved {}", path.display()),
                        Err(e) => {
                            warn!(file = %artifact.filename, error = %e, "could not save document");
                            println!("        could not save {}", artifact.filename);
                        }
                    }
                }
            }
        }
    }
}

/// Writes one decoded document under its reported filename.
///
/// Only the final path component of the reported name is used, so a
/// hostile filename cannot escape the download directory.
pub(crate) async fn save_artifact(dir: &Path, artifact: &PdfArtifact) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let name = Path::new(&artifact.filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    let path = dir.join(name);
    tokio::fs::write(&path, &artifact.bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(filename: &str) -> PdfArtifact {
        PdfArtifact {
            filename: filename.to_string(),
            bytes: Bytes::from_static(b"%PDF fake"),
        }
    }

    #[tokio::test]
    async fn save_artifact_writes_under_the_reported_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_artifact(dir.path(), &artifact("report.pdf")).await.unwrap();
        assert_eq!(path, dir.path().join("report.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF fake");
    }

    #[tokio::test]
    async fn save_artifact_strips_directory_components() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_artifact(dir.path(), &artifact("../../escape.pdf"))
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("escape.pdf"));
    }

    #[tokio::test]
    async fn save_artifact_creates_the_directory_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports");
        let path = save_artifact(&nested, &artifact("a.pdf")).await.unwrap();
        assert!(path.exists());
    }
}
