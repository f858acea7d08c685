//! Environment-driven configuration.
//!
//! Everything is read once at startup. A `.env` file is loaded by `main`
//! before [`Config::from_env`] runs.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context};

/// The only voice requests are synthesized with.
pub const VOICE_ID: &str = "Joanna";

const DEFAULT_AUDIO_DIR: &str = "audio_files";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_MAX_TEXT_CHARS: usize = 100_000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub audio_dir: PathBuf,
    pub aws: AwsConfig,
    pub session_secret: Option<String>,
    pub max_text_chars: usize,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Default)]
pub struct AwsConfig {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: String,
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .finish()
    }
}

impl AwsConfig {
    /// Static credentials, if both halves of the key pair are present.
    pub fn credentials(&self) -> Option<aws_credential_types::Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some(aws_credential_types::Credentials::new(
                id.clone(),
                secret.clone(),
                None,
                None,
                "environment",
            )),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a number, got '{}'", raw))?,
            None => 5000,
        };

        let session_secret = get("SESSION_SECRET");
        if let Some(secret) = &session_secret {
            if secret.len() < MIN_SESSION_SECRET_LEN {
                bail!(
                    "SESSION_SECRET must be at least {} bytes long",
                    MIN_SESSION_SECRET_LEN
                );
            }
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            audio_dir: get("AUDIO_DIR")
                .unwrap_or_else(|| DEFAULT_AUDIO_DIR.to_string())
                .into(),
            aws: AwsConfig {
                access_key_id: get("AWS_ACCESS_KEY_ID"),
                secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
                region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            },
            session_secret,
            max_text_chars: parse_or(
                "MAX_TEXT_CHARS",
                get("MAX_TEXT_CHARS"),
                DEFAULT_MAX_TEXT_CHARS,
            )?,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid address {}:{}", self.host, self.port))
    }
}

fn parse_or(key: &str, raw: Option<String>, default: usize) -> anyhow::Result<usize> {
    match raw {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a positive integer, got '{}'", key, raw)),
        None => Ok(default),
    }
}
