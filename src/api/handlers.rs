use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, Path, Request, State,
    },
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use std::path::{Component, Path as FsPath};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::{page, ConvertTextRequest, ConvertTextResponse, HealthResponse};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::extract::is_pdf_filename;
use crate::session::SessionState;

/// Landing page. The last generated file is shown once, then forgotten.
pub async fn index(jar: SignedCookieJar) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let mut session = SessionState::load(&jar);
    let audio_file = session.take_audio_file();
    let jar = session.save(jar)?;

    Ok((jar, Html(page::render_index(audio_file.as_deref()))))
}

pub async fn convert_pdf(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    let mut multipart = multipart?;
    let pdf = read_pdf_upload(&mut multipart).await?;

    let text = state.extractor.extract(pdf).await?;
    let filename = state.speech.convert(&text).await?;

    let jar = remember_audio_file(jar, filename)?;
    Ok((jar, Redirect::to("/")))
}

pub async fn convert_text(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    request: Result<Json<ConvertTextRequest>, JsonRejection>,
) -> Result<(SignedCookieJar, Json<ConvertTextResponse>), AppError> {
    let Json(request) = request?;

    // Validate input
    let text = request.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::BadRequest("No text provided".into()));
    }

    let max = state.limits.max_text_chars;
    if text.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "Text too long (max {} chars)",
            max
        )));
    }

    let filename = state.speech.convert(text).await?;

    let jar = remember_audio_file(jar, filename.clone())?;
    Ok((
        jar,
        Json(ConvertTextResponse {
            success: true,
            audio_file: filename,
        }),
    ))
}

pub async fn serve_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, AppError> {
    if !is_plain_filename(&filename) {
        return Err(AppError::AudioNotFound(filename));
    }

    let path = state.speech.audio_dir().join(&filename);
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Pull the `file` field out of the form, rejecting it before the body is
/// read if the filename is missing or not a PDF.
async fn read_pdf_upload(multipart: &mut Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            return Err(AppError::BadRequest("No selected file".into()));
        }
        if !is_pdf_filename(&filename) {
            return Err(AppError::BadRequest(format!(
                "'{}' is not a PDF file",
                filename
            )));
        }

        let bytes = field.bytes().await?;
        tracing::info!("Received {} ({} bytes)", filename, bytes.len());
        return Ok(bytes);
    }

    Err(AppError::BadRequest("No file part in the request".into()))
}

fn remember_audio_file(
    jar: SignedCookieJar,
    filename: String,
) -> Result<SignedCookieJar, AppError> {
    let mut session = SessionState::load(&jar);
    session.audio_file = Some(filename);
    session.save(jar)
}

/// A single normal path component that is not hidden.
fn is_plain_filename(name: &str) -> bool {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = FsPath::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_filenames() {
        assert!(is_plain_filename("0123456789abcdef0123456789abcdef.mp3"));
        assert!(is_plain_filename("song.mp3"));
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(!is_plain_filename(""));
        assert!(!is_plain_filename(".."));
        assert!(!is_plain_filename("../secret"));
        assert!(!is_plain_filename("a/b.mp3"));
        assert!(!is_plain_filename("..\\boot.ini"));
        assert!(!is_plain_filename("/etc/passwd"));
        assert!(!is_plain_filename(".env"));
    }
}
