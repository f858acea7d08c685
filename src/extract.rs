//! PDF text extraction.

use async_trait::async_trait;
use axum::body::Bytes;

use crate::error::AppError;

/// Turns an uploaded document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, pdf: Bytes) -> Result<String, AppError>;
}

/// Extractor backed by the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, pdf: Bytes) -> Result<String, AppError> {
        // Parsing is CPU-bound and pdf-extract can panic on malformed input.
        tokio::task::spawn_blocking(move || extract_pages(&pdf))
            .await
            .map_err(|e| AppError::Extraction(format!("PDF parser aborted: {}", e)))?
    }
}

/// Extract every page in document order and join them with no separator.
pub fn extract_pages(pdf: &[u8]) -> Result<String, AppError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf)
        .map_err(|e| AppError::Extraction(format!("Failed to read PDF: {}", e)))?;

    tracing::debug!("Extracted text from {} page(s)", pages.len());

    Ok(pages.concat())
}

/// True when the uploaded filename has a `.pdf` extension (any case).
pub fn is_pdf_filename(filename: &str) -> bool {
    let name = filename.trim();
    name.len() > ".pdf".len()
        && name
            .get(name.len() - 4..)
            .map(|ext| ext.eq_ignore_ascii_case(".pdf"))
            .unwrap_or(false)
}
