//! PDF/text to speech web service.
//!
//! - `api`: routes, handlers and page rendering
//! - `extract`: PDF text extraction
//! - `tts`: speech synthesis and audio file management
//! - `session`: signed-cookie session state

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod session;
pub mod tts;
