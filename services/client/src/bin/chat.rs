//! services/client/src/bin/chat.rs

use client_lib::{AppError, Config, HttpBackendAdapter, Repl};
use dispute_assistant_core::Conversation;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Talking to {}", config.backend_base_url);

    // --- 2. Build the HTTP Client & Backend Adapter ---
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("could not build HTTP client: {e}")))?;
    let backend = Arc::new(HttpBackendAdapter::new(http, config.backend_base_url.clone()));

    // --- 3. Start the Conversation & Run the Front End ---
    let conversation = Conversation::new(backend, config.follow_up_policy, &config.greeting_text);
    Repl::new(conversation, config.download_dir.clone()).run().await
}
