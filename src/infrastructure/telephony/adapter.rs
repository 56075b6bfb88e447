//! Telephony integration adapter
//!
//! Bridges the OS-level call reporting facility and the internal call
//! model. Outbound reporting goes through the manager's
//! [`SystemCallReporter`](crate::domain::call::reporting::SystemCallReporter)
//! port; this adapter is the inbound surface, translating system-driven
//! callbacks (which may arrive on any task) into session manager
//! operations and answering every action with exactly one fulfill or
//! fail.

use crate::domain::session_manager::CallSessionManager;
use crate::domain::shared::error::CallError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, Handle};
use crate::infrastructure::telephony::action::{
    ActionKind, AnswerCallAction, EndCallAction, SetHeldCallAction, StartCallAction,
};
use std::sync::Arc;
use tracing::warn;

/// Inbound callback surface of the telephony integration layer
pub struct TelephonyAdapter {
    manager: Arc<CallSessionManager>,
}

impl TelephonyAdapter {
    pub fn new(manager: Arc<CallSessionManager>) -> Self {
        Self { manager }
    }

    /// Surface an incoming call through the system call UI
    ///
    /// On failure the conversation resource has already been left by the
    /// manager; the error only tells the network side the call was not
    /// announced.
    pub async fn report_incoming(&self, id: CallId, handle: Handle, has_video: bool) -> Result<()> {
        self.manager.announce_incoming(id, handle, has_video).await
    }

    /// Surface an incoming call for a conversation
    ///
    /// The conversation's remote identifier doubles as the call
    /// identifier; a conversation that has none cannot be reported.
    pub async fn report_incoming_for_conversation(
        &self,
        remote_id: Option<uuid::Uuid>,
        handle: Handle,
        has_video: bool,
    ) -> Result<()> {
        let id = remote_id
            .map(CallId::from_uuid)
            .ok_or(CallError::MissingRemoteIdentifier)?;
        self.report_incoming(id, handle, has_video).await
    }

    /// Provider reset: every call is dropped locally
    pub async fn on_reset(&self) {
        self.manager.reset().await;
    }

    /// User started an outgoing call from the system UI
    pub async fn perform_start(&self, action: StartCallAction) {
        let StartCallAction {
            call_id,
            handle,
            has_video,
            completion,
        } = action;

        match self.manager.start_call(call_id, handle, has_video).await {
            Ok(()) => completion.fulfill(),
            Err(e) => completion.fail(e),
        }
    }

    /// User answered an incoming call (lock screen or system UI)
    pub async fn perform_answer(&self, action: AnswerCallAction) {
        let AnswerCallAction {
            call_id,
            completion,
        } = action;

        match self.manager.answer_call(call_id).await {
            Ok(()) => completion.fulfill(),
            Err(e) => completion.fail(e),
        }
    }

    /// User ended a call from the system UI
    pub async fn perform_end(&self, action: EndCallAction) {
        let EndCallAction {
            call_id,
            completion,
        } = action;

        match self.manager.end_call(call_id).await {
            Ok(()) => completion.fulfill(),
            Err(e) => completion.fail(e),
        }
    }

    /// User held or resumed a call from the system UI
    pub async fn perform_set_held(&self, action: SetHeldCallAction) {
        let SetHeldCallAction {
            call_id,
            on_hold,
            completion,
        } = action;

        match self.manager.set_held(call_id, on_hold).await {
            Ok(()) => completion.fulfill(),
            Err(e) => completion.fail(e),
        }
    }

    /// The system gave up waiting for an action
    ///
    /// No fulfill/fail obligation; the action value was already consumed
    /// by the system side.
    pub fn on_timeout(&self, kind: ActionKind, call_id: CallId) {
        warn!(call_id = %call_id, "Timed out performing {kind:?} action");
    }

    /// System activated the audio session after boosting its priority
    pub fn on_audio_activated(&self) {
        self.manager.handle_audio_activated();
    }

    /// System deactivated the audio session
    pub fn on_audio_deactivated(&self) {
        self.manager.handle_audio_deactivated();
    }
}
