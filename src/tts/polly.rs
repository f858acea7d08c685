use async_trait::async_trait;
use aws_sdk_polly::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_polly::types::{OutputFormat, VoiceId};
use aws_sdk_polly::Client;

use super::SpeechSynthesizer;
use crate::config::AwsConfig;
use crate::error::AppError;

/// Error codes Polly (and the STS/IAM layer in front of it) uses for
/// missing, malformed or rejected credentials.
const AUTH_ERROR_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "SignatureDoesNotMatch",
    "InvalidClientTokenId",
    "AccessDeniedException",
    "ExpiredTokenException",
    "MissingAuthenticationToken",
];

/// Amazon Polly backend.
///
/// Without credentials no client is built and every call fails with
/// [`AppError::Auth`] before touching the network.
pub struct PollySynthesizer {
    client: Option<Client>,
}

impl PollySynthesizer {
    pub async fn new(config: &AwsConfig) -> Self {
        let Some(credentials) = config.credentials() else {
            tracing::warn!("AWS credentials are not set; conversions will be rejected");
            return Self { client: None };
        };

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        tracing::info!("Polly client ready (region {})", config.region);

        Self {
            client: Some(Client::new(&sdk_config)),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, AppError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::Auth("AWS credentials are not configured".into()))?;

        let output = client
            .synthesize_speech()
            .text(text)
            .output_format(OutputFormat::Mp3)
            .voice_id(VoiceId::from(voice))
            .send()
            .await
            .map_err(|e| classify_error(e.code(), DisplayErrorContext(&e).to_string()))?;

        let audio = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| AppError::Synthesis(format!("Failed to read audio stream: {}", e)))?;

        Ok(audio.into_bytes().to_vec())
    }
}

fn classify_error(code: Option<&str>, message: String) -> AppError {
    match code {
        Some(code) if AUTH_ERROR_CODES.contains(&code) => AppError::Auth(message),
        _ => AppError::Synthesis(message),
    }
}
