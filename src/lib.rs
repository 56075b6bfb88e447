//! Ringline - call session management
//!
//! Tracks the lifecycle of voice/video calls, keeps the internal call
//! registry consistent with an OS telephony integration layer, and
//! coordinates audio-session start/stop with call state. Embedded as a
//! library in a host application; the signaling transport and the system
//! call reporting facility are supplied as ports.

pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use config::{ProviderConfiguration, SettingsProvider};
pub use domain::call::{
    Call, CallDirection, CallEvent, CallObserver, CallRegistry, CallState, EndReason,
    SignalingTransport, SystemCallReporter, VoiceChannel,
};
pub use domain::session_manager::CallSessionManager;
pub use domain::shared::{CallError, CallId, Handle, HandleKind, Result};
pub use infrastructure::telephony::{
    ActionCompletion, ActionKind, ActionReceipt, AnswerCallAction, EndCallAction,
    SetHeldCallAction, StartCallAction, TelephonyAdapter,
};
