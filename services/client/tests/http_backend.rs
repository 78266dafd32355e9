//! Integration tests for the HTTP backend adapter, driven against a
//! throwaway in-process server speaking the backend contract.

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Json, Router};
use bytes::Bytes;
use client_lib::HttpBackendAdapter;
use dispute_assistant_core::{BackendService, PortError, StagedFile};
use serde::Deserialize;
use serde_json::{json, Value};

async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn adapter(base_url: &str) -> HttpBackendAdapter {
    HttpBackendAdapter::new(reqwest::Client::new(), base_url)
}

async fn chat_handler(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["message"] != "I was fired without notice" {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "reply": "Here is your report.",
            "is_report": true,
            "pdfs": [{"filename": "report.pdf", "pdf_base64": "JVBERg=="}],
        })),
    )
}

#[tokio::test]
async fn chat_round_trip_carries_the_report_payload() {
    let base = spawn_backend(Router::new().route("/chat", post(chat_handler))).await;

    let reply = adapter(&base)
        .send_chat("I was fired without notice")
        .await
        .unwrap();
    assert_eq!(reply.reply, "Here is your report.");
    assert!(reply.is_report);
    assert_eq!(reply.pdfs.len(), 1);
    assert_eq!(reply.pdfs[0].filename, "report.pdf");
    assert_eq!(reply.pdfs[0].pdf_base64, "JVBERg==");
}

async fn bare_reply_handler(Json(_): Json<Value>) -> Json<Value> {
    Json(json!({"reply": "Tell me more."}))
}

#[tokio::test]
async fn missing_report_fields_default_to_a_plain_reply() {
    let base = spawn_backend(Router::new().route("/chat", post(bare_reply_handler))).await;

    let reply = adapter(&base).send_chat("hello").await.unwrap();
    assert_eq!(reply.reply, "Tell me more.");
    assert!(!reply.is_report);
    assert!(reply.pdfs.is_empty());
}

async fn upload_handler(mut multipart: Multipart) -> StatusCode {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap();
        parts.push((name, file_name, data.len()));
    }
    let expected = [
        ("file".to_string(), "fileA.pdf".to_string(), 4),
        ("file".to_string(), "fileB.docx".to_string(), 5),
    ];
    if parts == expected {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

#[tokio::test]
async fn upload_sends_every_staged_file_in_one_request() {
    let base = spawn_backend(Router::new().route("/upload", post(upload_handler))).await;

    let files = vec![
        StagedFile {
            name: "fileA.pdf".to_string(),
            bytes: Bytes::from_static(b"aaaa"),
        },
        StagedFile {
            name: "fileB.docx".to_string(),
            bytes: Bytes::from_static(b"bbbbb"),
        },
    ];
    adapter(&base).upload_files(files).await.unwrap();
}

#[derive(Deserialize)]
struct ConfirmForm {
    confirmed: bool,
}

async fn confirm_handler(Form(form): Form<ConfirmForm>) -> (StatusCode, Json<Value>) {
    if !form.confirmed {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({"reply": "Report submitted."})))
}

#[tokio::test]
async fn confirm_report_posts_the_decision_form_encoded() {
    let base = spawn_backend(Router::new().route("/confirm-report", post(confirm_handler))).await;

    let reply = adapter(&base).confirm_report(true).await.unwrap();
    assert_eq!(reply, "Report submitted.");
}

async fn after_handler(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["message"] != "Report submitted." {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({"reply": "Here is what happens next."})))
}

#[tokio::test]
async fn after_report_carries_the_prior_reply_text() {
    let base = spawn_backend(Router::new().route("/after-report", post(after_handler))).await;

    let reply = adapter(&base).after_report("Report submitted.").await.unwrap();
    assert_eq!(reply, "Here is what happens next.");
}

async fn failing_handler() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

#[tokio::test]
async fn non_success_statuses_become_transport_errors() {
    let base = spawn_backend(Router::new().route("/chat", post(failing_handler))).await;

    let err = adapter(&base).send_chat("hello").await.unwrap_err();
    assert!(matches!(err, PortError::Transport(_)));
}

#[tokio::test]
async fn an_empty_upload_is_rejected_before_anything_is_sent() {
    // nothing is listening here either; the call must not get that far
    let err = adapter("http://127.0.0.1:9")
        .upload_files(Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::InvalidRequest(_)));
}

#[tokio::test]
async fn an_unreachable_backend_becomes_a_transport_error() {
    // nothing is listening on this port
    let err = adapter("http://127.0.0.1:9")
        .send_chat("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Transport(_)));
}
