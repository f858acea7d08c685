//! Per-client session state carried in a signed cookie.
//!
//! The cookie value is the JSON-encoded [`SessionState`], base64url encoded
//! and signed with the server key. A cookie that fails verification or
//! decoding reads as an empty session.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
}

impl SessionState {
    pub fn load(jar: &SignedCookieJar) -> Self {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| Self::decode(cookie.value()))
            .unwrap_or_default()
    }

    /// Write the state back into the jar; an empty state drops the cookie.
    pub fn save(&self, jar: SignedCookieJar) -> Result<SignedCookieJar, AppError> {
        if self.is_empty() {
            return Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")));
        }

        let cookie = Cookie::build((SESSION_COOKIE, self.encode()?))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);

        Ok(jar.add(cookie))
    }

    /// Read-once access to the last generated file.
    pub fn take_audio_file(&mut self) -> Option<String> {
        self.audio_file.take()
    }

    pub fn is_empty(&self) -> bool {
        self.audio_file.is_none()
    }

    fn encode(&self) -> Result<String, AppError> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(value: &str) -> Option<Self> {
        let json = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

/// Signing key: derived from the configured secret, or random for this
/// process when none is set.
pub fn session_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => Key::generate(),
    }
}
