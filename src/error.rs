//! Error types for the assistant

use std::time::Duration;

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the assistant
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing key, unreadable file)
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text service error
    #[error("STT error: {0}")]
    Stt(String),

    /// Audio was captured but nothing intelligible was in it
    #[error("could not understand audio")]
    Unintelligible,

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A collaborator did not answer in time
    #[error("{service} timed out after {after:?}")]
    Timeout {
        /// Collaborator name
        service: &'static str,
        /// Configured limit
        after: Duration,
    },

    /// A collaborator answered with something unusable
    #[error("{service} error: {message}")]
    Service {
        /// Collaborator name
        service: &'static str,
        /// What went wrong
        message: String,
    },

    /// User input could not be parsed (dates, numbers, times)
    #[error("parse error: {0}")]
    Parse(String),

    /// Launching a program or opening a URL failed
    #[error("launch error: {0}")]
    Launch(String),

    /// Email composition or transport error
    #[error("email error: {0}")]
    Email(String),
}

impl Error {
    /// Build a [`Error::Service`] for the named collaborator
    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            service,
            message: message.into(),
        }
    }
}
