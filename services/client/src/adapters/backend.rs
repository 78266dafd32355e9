//! services/client/src/adapters/backend.rs
//!
//! This module contains the HTTP adapter for the conversation backend.
//! It implements the `BackendService` port from the `core` crate.

use async_trait::async_trait;
use dispute_assistant_core::{
    BackendService, ChatReply, PdfPayload, PortError, PortResult, StagedFile,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

//=========================================================================================
// Wire Shapes
//=========================================================================================

#[derive(Serialize)]
struct MessageRequest<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ConfirmForm {
    confirmed: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: String,
    #[serde(default)]
    is_report: bool,
    #[serde(default)]
    pdfs: Vec<PdfEntry>,
}

#[derive(Deserialize)]
struct PdfEntry {
    filename: String,
    pdf_base64: String,
}

#[derive(Deserialize)]
struct ReplyResponse {
    reply: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `BackendService` port over HTTP.
///
/// The request timeout configured on the `reqwest::Client` bounds every
/// call, so a hung backend resolves to a transport error instead of a
/// conversation stuck in flight. No call retries.
#[derive(Clone)]
pub struct HttpBackendAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendAdapter {
    /// Creates a new `HttpBackendAdapter` for the injected base URL.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport(e: reqwest::Error) -> PortError {
    PortError::Transport(e.to_string())
}

//=========================================================================================
// `BackendService` Trait Implementation
//=========================================================================================

#[async_trait]
impl BackendService for HttpBackendAdapter {
    /// POSTs the user's message to `/chat` and returns the reply payload.
    async fn send_chat(&self, message: &str) -> PortResult<ChatReply> {
        debug!(endpoint = "/chat", "sending chat turn");
        let response = self
            .client
            .post(self.endpoint("/chat"))
            .json(&MessageRequest { message })
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let body: ChatResponse = response.json().await.map_err(transport)?;
        Ok(ChatReply {
            reply: body.reply,
            is_report: body.is_report,
            pdfs: body
                .pdfs
                .into_iter()
                .map(|p| PdfPayload {
                    filename: p.filename,
                    pdf_base64: p.pdf_base64,
                })
                .collect(),
        })
    }

    /// POSTs every staged file to `/upload` as one multipart request.
    async fn upload_files(&self, files: Vec<StagedFile>) -> PortResult<()> {
        if files.is_empty() {
            return Err(PortError::InvalidRequest("no files to upload".to_string()));
        }
        debug!(endpoint = "/upload", count = files.len(), "uploading attachments");
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                .file_name(file.name);
            form = form.part("file", part);
        }
        self.client
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        Ok(())
    }

    /// POSTs the user's decision to `/confirm-report`, form-encoded.
    async fn confirm_report(&self, confirmed: bool) -> PortResult<String> {
        debug!(endpoint = "/confirm-report", confirmed, "sending report decision");
        let response = self
            .client
            .post(self.endpoint("/confirm-report"))
            .form(&ConfirmForm { confirmed })
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let body: ReplyResponse = response.json().await.map_err(transport)?;
        Ok(body.reply)
    }

    /// POSTs the prior reply text to `/after-report` for the follow-up.
    async fn after_report(&self, message: &str) -> PortResult<String> {
        debug!(endpoint = "/after-report", "sending follow-up context");
        let response = self
            .client
            .post(self.endpoint("/after-report"))
            .json(&MessageRequest { message })
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let body: ReplyResponse = response.json().await.map_err(transport)?;
        Ok(body.reply)
    }
}
