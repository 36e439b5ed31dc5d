use thiserror::Error;

use crate::llm_client::LlmError;
use crate::session::store::StoreError;

/// Everything that can go wrong while a session handles one frame.
///
/// Each variant reaches the client as exactly one `error` frame; the display
/// text is the frame's `message`. None of them change the session phase.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid message: frame is not valid UTF-8")]
    InvalidUtf8,

    #[error("Unknown message type")]
    UnknownMessageType,

    #[error("Unrecognized job listing: expected text, a parse result, or listing fields")]
    UnrecognizedJobListing,

    #[error("Session already initialized")]
    AlreadyInitialized,

    #[error("Session not initialized: send init first")]
    NotInitialized,

    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Generation timed out after {0}s")]
    GenerationTimedOut(u64),

    #[error("Failed to persist history: {0}")]
    Persistence(#[from] StoreError),

    #[error("Session actor is no longer running")]
    ActorUnavailable,

    #[error("Session was opened in another connection")]
    Superseded,

    #[error("Client is not reading replies")]
    ClientStalled,
}

impl SessionError {
    /// Client mistakes as opposed to upstream failures; used for log levels.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            SessionError::Decode(_)
                | SessionError::InvalidUtf8
                | SessionError::UnknownMessageType
                | SessionError::UnrecognizedJobListing
                | SessionError::AlreadyInitialized
                | SessionError::NotInitialized
        )
    }
}
