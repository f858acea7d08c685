pub mod chunk;
pub mod polly;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::VOICE_ID;
use crate::error::AppError;

pub use polly::PollySynthesizer;

/// A text-to-speech backend that returns MP3 bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, AppError>;
}

/// Converts text to an MP3 file in the audio directory.
pub struct SpeechService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    audio_dir: PathBuf,
    voice: String,
}

impl SpeechService {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, audio_dir: PathBuf) -> Self {
        Self {
            synthesizer,
            audio_dir,
            voice: VOICE_ID.to_string(),
        }
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Synthesize `text` and store it, returning the new file's basename.
    ///
    /// Nothing is written unless every chunk synthesizes successfully.
    pub async fn convert(&self, text: &str) -> Result<String, AppError> {
        let chunks = chunk::split(text, chunk::MAX_CHUNK_CHARS);
        let mut audio = Vec::new();

        for (i, piece) in chunks.iter().enumerate() {
            tracing::debug!(
                "Synthesizing chunk {}/{} ({} chars)",
                i + 1,
                chunks.len(),
                piece.chars().count()
            );
            let bytes = self.synthesizer.synthesize(piece, &self.voice).await?;
            audio.extend_from_slice(&bytes);
        }

        let filename = generate_filename();
        let path = self.audio_dir.join(&filename);

        // create_new: a name collision fails instead of clobbering another file.
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        if let Err(e) = write_audio(file, &audio).await {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                tracing::warn!("Failed to remove partial {}: {}", path.display(), cleanup);
            }
            return Err(e.into());
        }

        tracing::info!(
            "Wrote {} ({} bytes, {} chunk(s))",
            filename,
            audio.len(),
            chunks.len()
        );

        Ok(filename)
    }
}

async fn write_audio<W>(mut out: W, audio: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(audio).await?;
    out.flush().await
}

/// 16 random bytes, hex encoded, with an `.mp3` suffix.
pub fn generate_filename() -> String {
    let bytes: [u8; 16] = rand::random();
    format!("{}.mp3", hex::encode(bytes))
}
