//! Error types for voice-chat
//!
//! The encode pipeline itself never fails; these cover capture sources,
//! the chat transport and the surrounding orchestration.

use thiserror::Error;

/// Main error type for voice-chat
#[derive(Error, Debug)]
pub enum Error {
    /// Capture device or source could not be started
    #[error("Capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// Network failure reaching the chat service
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Chat service answered with a non-success status
    #[error("Chat service error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Chat service answered with something we cannot use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Unreadable or unsupported WAV data
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Operation not valid in the current recorder state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Exchange with neither text nor audio
    #[error("Message has no text and no audio")]
    EmptyMessage,

    /// Missing or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using voice-chat Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::TransportFailure(e.to_string())
    }
}

impl From<hound::Error> for Error {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => Error::Io(io),
            other => Error::InvalidAudio(other.to_string()),
        }
    }
}
