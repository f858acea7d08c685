use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pdf_voice_server::api::routes::{create_router, AppState, Limits};
use pdf_voice_server::config::Config;
use pdf_voice_server::extract::PdfTextExtractor;
use pdf_voice_server::session::session_key;
use pdf_voice_server::tts::{PollySynthesizer, SpeechService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;

    tracing::info!("PDF voice server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Audio directory: {}", config.audio_dir.display());

    tokio::fs::create_dir_all(&config.audio_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.audio_dir.display()))?;

    if config.session_secret.is_none() {
        tracing::warn!("SESSION_SECRET not set; sessions will not survive a restart");
    }

    // Built once, shared read-only by every request
    let synthesizer = PollySynthesizer::new(&config.aws).await;
    let speech = SpeechService::new(Arc::new(synthesizer), config.audio_dir.clone());

    let state = AppState {
        speech: Arc::new(speech),
        extractor: Arc::new(PdfTextExtractor),
        session_key: session_key(config.session_secret.as_deref()),
        limits: Limits {
            max_text_chars: config.max_text_chars,
            max_upload_bytes: config.max_upload_bytes,
        },
    };

    let app = create_router(state);

    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
