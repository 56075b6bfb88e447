//! Call value objects

use serde::{Deserialize, Serialize};

/// Call direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallDirection {
    /// Call announced by a remote party
    Incoming,
    /// Call initiated by the local user
    Outgoing,
}

/// Call state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    /// Outgoing call handed to the signaling transport, not yet accepted
    Initiating,
    /// Transport accepted the call (outgoing) or the callee is being
    /// alerted (incoming, ringing)
    Connecting,
    /// Media is flowing
    Connected,
    /// Call is on hold
    Held,
    /// Terminal state; no further transitions are valid
    Ended(EndReason),
}

impl CallState {
    /// Check if a state transition is valid
    pub fn can_transition_to(&self, new_state: &CallState) -> bool {
        use CallState::*;

        match (self, new_state) {
            // From Initiating
            (Initiating, Connecting) => true,
            (Initiating, Ended(_)) => true,

            // From Connecting
            (Connecting, Connected) => true,
            (Connecting, Ended(_)) => true,

            // From Connected
            (Connected, Held) => true,
            (Connected, Ended(_)) => true,

            // From Held
            (Held, Connected) => true,
            (Held, Ended(_)) => true,

            // Ended is absorbing
            (Ended(_), _) => false,

            // All other transitions are invalid
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Ended(_))
    }

    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// Reason for call ending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Normal call completion (local or remote hangup)
    NormalClearing,
    /// Call was rejected before being established
    Rejected,
    /// Call setup or signaling failed
    Failed(String),
    /// Call was canceled before being established
    Canceled,
    /// Integration layer reset; all calls dropped locally
    Reset,
}
