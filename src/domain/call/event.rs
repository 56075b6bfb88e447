//! Call lifecycle events and the observer surface

use crate::domain::call::value_object::{CallDirection, EndReason};
use crate::domain::shared::value_objects::{CallId, Handle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base trait for all call events
pub trait DomainEvent: Send + Sync {
    /// Returns the event type name
    fn event_type(&self) -> &'static str;

    /// Returns when the event occurred
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Event metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Base struct for all call events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEventBase {
    pub metadata: EventMetadata,
    pub call_id: CallId,
}

impl CallEventBase {
    pub fn new(call_id: CallId) -> Self {
        Self {
            metadata: EventMetadata::new(),
            call_id,
        }
    }
}

/// Outgoing call handed to the signaling transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallInitiated {
    pub base: CallEventBase,
    pub handle: Handle,
    pub direction: CallDirection,
    pub has_video: bool,
}

impl DomainEvent for CallInitiated {
    fn event_type(&self) -> &'static str {
        "call.initiated"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Incoming call announced to the system (ringing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRinging {
    pub base: CallEventBase,
    pub handle: Handle,
    pub has_video: bool,
}

impl DomainEvent for CallRinging {
    fn event_type(&self) -> &'static str {
        "call.ringing"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Transport accepted the outgoing call; connection in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallConnecting {
    pub base: CallEventBase,
    pub connecting_at: DateTime<Utc>,
}

impl DomainEvent for CallConnecting {
    fn event_type(&self) -> &'static str {
        "call.connecting"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Media path established
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallConnected {
    pub base: CallEventBase,
    pub connected_at: DateTime<Utc>,
}

impl DomainEvent for CallConnected {
    fn event_type(&self) -> &'static str {
        "call.connected"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Call placed on hold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallHeld {
    pub base: CallEventBase,
}

impl DomainEvent for CallHeld {
    fn event_type(&self) -> &'static str {
        "call.held"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Call resumed from hold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResumed {
    pub base: CallEventBase,
}

impl DomainEvent for CallResumed {
    fn event_type(&self) -> &'static str {
        "call.resumed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Call reached its terminal state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEnded {
    pub base: CallEventBase,
    pub reason: EndReason,
    pub ended_at: DateTime<Utc>,
    pub duration_seconds: Option<i64>,
}

impl DomainEvent for CallEnded {
    fn event_type(&self) -> &'static str {
        "call.ended"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Union of all call events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CallEvent {
    Initiated(CallInitiated),
    Ringing(CallRinging),
    Connecting(CallConnecting),
    Connected(CallConnected),
    Held(CallHeld),
    Resumed(CallResumed),
    Ended(CallEnded),
}

impl CallEvent {
    pub fn call_id(&self) -> &CallId {
        match self {
            CallEvent::Initiated(e) => &e.base.call_id,
            CallEvent::Ringing(e) => &e.base.call_id,
            CallEvent::Connecting(e) => &e.base.call_id,
            CallEvent::Connected(e) => &e.base.call_id,
            CallEvent::Held(e) => &e.base.call_id,
            CallEvent::Resumed(e) => &e.base.call_id,
            CallEvent::Ended(e) => &e.base.call_id,
        }
    }
}

/// Observer notified synchronously after each applied transition
///
/// Called inside the session manager's critical section; implementations
/// must not call back into the manager and must return quickly.
pub trait CallObserver: Send + Sync {
    fn on_call_event(&self, event: &CallEvent);
}
