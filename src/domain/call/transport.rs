//! Signaling ports
//!
//! Defined in the domain layer as traits (ports) and implemented by the
//! host application's network layer (adapters).

use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, Handle};
use async_trait::async_trait;

/// Port to the signaling layer that establishes and tears down the media
/// path of a call.
///
/// Implementations must not block and must resolve each call exactly once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    /// Start an outgoing call towards the given handle
    async fn start_call(&self, id: CallId, handle: Handle, has_video: bool) -> Result<()>;

    /// Answer a previously announced incoming call
    async fn answer_call(&self, id: CallId) -> Result<()>;

    /// Tear down a call; best-effort from the caller's point of view
    async fn end_call(&self, id: CallId) -> Result<()>;
}

/// Port to the conversation-level call resource
///
/// Leaving releases whatever the conversation holds for an announced call;
/// it is fired when the system rejects a call announcement or on provider
/// reset, so no half-registered call is left behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoiceChannel: Send + Sync {
    async fn leave(&self, id: CallId);
}
