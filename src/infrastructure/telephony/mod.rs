//! Telephony integration - OS-level call reporting bridge

pub mod action;
pub mod adapter;

pub use action::{
    ActionCompletion, ActionKind, ActionReceipt, ActionResult, AnswerCallAction, EndCallAction,
    SetHeldCallAction, StartCallAction,
};
pub use adapter::TelephonyAdapter;
