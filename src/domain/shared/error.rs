//! Domain errors

use crate::domain::shared::value_objects::CallId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Call {0} already exists")]
    DuplicateCall(CallId),

    #[error("No call registered for {0}")]
    UnknownCall(CallId),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Signaling transport failed: {0}")]
    Transport(String),

    #[error("Call reporting rejected by the system: {0}")]
    Reporting(String),

    #[error("Audio start requested before the audio session was activated")]
    PrematureAudioStart,

    #[error("Missing remote identifier for conversation")]
    MissingRemoteIdentifier,
}
