use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::extract::TextExtractor;
use crate::tts::SpeechService;

#[derive(Clone)]
pub struct AppState {
    pub speech: Arc<SpeechService>,
    pub extractor: Arc<dyn TextExtractor>,
    pub session_key: Key,
    pub limits: Limits,
}

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_text_chars: usize,
    pub max_upload_bytes: usize,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.limits.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::index))
        .route("/convert-pdf", post(handlers::convert_pdf))
        .route("/convert", post(handlers::convert_pdf))
        .route("/convert-text", post(handlers::convert_text))
        .route("/audio/:filename", get(handlers::serve_audio))
        .route("/health", get(handlers::health))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
