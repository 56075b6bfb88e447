//! System-requested call actions
//!
//! The OS integration layer forwards user actions (start, answer, end,
//! hold) as action values that must be answered with exactly one of
//! fulfill or fail. Both consume the completion handle, so the
//! exactly-once protocol is enforced by move semantics.

use crate::domain::shared::error::CallError;
use crate::domain::shared::value_objects::{CallId, Handle};
use tokio::sync::oneshot;

/// Outcome delivered back to the OS integration layer
pub type ActionResult = std::result::Result<(), CallError>;

/// Receiving side of an action's completion signal
pub type ActionReceipt = oneshot::Receiver<ActionResult>;

/// Completion signal for one system-requested action
#[derive(Debug)]
pub struct ActionCompletion {
    tx: oneshot::Sender<ActionResult>,
}

impl ActionCompletion {
    pub fn channel() -> (Self, ActionReceipt) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Signal that the action has been successfully performed
    pub fn fulfill(self) {
        // The requesting side may have stopped listening; nothing to do.
        let _ = self.tx.send(Ok(()));
    }

    /// Signal that the action was unable to be performed
    pub fn fail(self, error: CallError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Kind of action, for timeout reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Start,
    Answer,
    End,
    SetHeld,
}

/// Start an outgoing call
#[derive(Debug)]
pub struct StartCallAction {
    pub call_id: CallId,
    pub handle: Handle,
    pub has_video: bool,
    pub completion: ActionCompletion,
}

impl StartCallAction {
    pub fn new(call_id: CallId, handle: Handle, has_video: bool) -> (Self, ActionReceipt) {
        let (completion, receipt) = ActionCompletion::channel();
        (
            Self {
                call_id,
                handle,
                has_video,
                completion,
            },
            receipt,
        )
    }
}

/// Answer a ringing incoming call
#[derive(Debug)]
pub struct AnswerCallAction {
    pub call_id: CallId,
    pub completion: ActionCompletion,
}

impl AnswerCallAction {
    pub fn new(call_id: CallId) -> (Self, ActionReceipt) {
        let (completion, receipt) = ActionCompletion::channel();
        (
            Self {
                call_id,
                completion,
            },
            receipt,
        )
    }
}

/// End a call
#[derive(Debug)]
pub struct EndCallAction {
    pub call_id: CallId,
    pub completion: ActionCompletion,
}

impl EndCallAction {
    pub fn new(call_id: CallId) -> (Self, ActionReceipt) {
        let (completion, receipt) = ActionCompletion::channel();
        (
            Self {
                call_id,
                completion,
            },
            receipt,
        )
    }
}

/// Put a call on hold or resume it
#[derive(Debug)]
pub struct SetHeldCallAction {
    pub call_id: CallId,
    pub on_hold: bool,
    pub completion: ActionCompletion,
}

impl SetHeldCallAction {
    pub fn new(call_id: CallId, on_hold: bool) -> (Self, ActionReceipt) {
        let (completion, receipt) = ActionCompletion::channel();
        (
            Self {
                call_id,
                on_hold,
                completion,
            },
            receipt,
        )
    }
}
