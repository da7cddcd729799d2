pub mod audio;
pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod speech;
pub mod telephony;

pub use audio::{resample, PcmBuffer};
pub use cache::{CacheManager, TextFingerprint};
pub use config::{Config, ConfigHandle};
pub use orchestrator::{say, SayRequest};
pub use speech::{BufferSink, ChannelSink, PcmSink, SinkControl, TtsEngine, VoiceParams};
pub use telephony::{PlaybackChannel, PlaybackOutcome};

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TelespeakError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Resample error: {0}")]
    Resample(String),

    #[error("Cache write error: {0}")]
    CacheWrite(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TelespeakError {
    fn from(e: std::io::Error) -> Self {
        TelespeakError::Io(e.to_string())
    }
}

impl TelespeakError {
    /// Check if this error degrades gracefully instead of failing the request
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Falls back to built-in defaults
            TelespeakError::Config(_) => true,
            // Best-effort; the request has already played its result
            TelespeakError::CacheWrite(_) => true,
            // Fatal to the in-flight request, no retries
            TelespeakError::Synthesis(_) => false,
            TelespeakError::Resample(_) => false,
            TelespeakError::Playback(_) => false,
            TelespeakError::Io(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TelespeakError>;
