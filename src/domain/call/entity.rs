//! Call entity
//!
//! Owns the per-call state machine and enforces transition validity and
//! timestamp ordering. Transitions record lifecycle events which the
//! session manager drains and dispatches to observers.

use crate::domain::call::event::{
    CallConnected, CallConnecting, CallEnded, CallEvent, CallEventBase, CallHeld, CallInitiated,
    CallResumed, CallRinging,
};
use crate::domain::call::value_object::{CallDirection, CallState, EndReason};
use crate::domain::shared::error::CallError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, Handle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One call attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    /// Call identifier, stable for the lifetime of the attempt
    id: CallId,
    /// Current state
    state: CallState,
    /// Call direction
    direction: CallDirection,
    /// Remote-party handle
    handle: Handle,
    /// Whether the call carries video
    has_video: bool,
    /// When the call started connecting (ringing, for incoming calls)
    connecting_at: Option<DateTime<Utc>>,
    /// When the media path was established
    connected_at: Option<DateTime<Utc>>,
    /// When the call ended
    ended_at: Option<DateTime<Utc>>,
    /// Pending lifecycle events
    #[serde(skip)]
    events: Vec<CallEvent>,
}

impl Call {
    /// Create a new outgoing call in `Initiating` state
    pub fn outgoing(id: CallId, handle: Handle, has_video: bool) -> Self {
        let mut call = Self {
            id,
            state: CallState::Initiating,
            direction: CallDirection::Outgoing,
            handle: handle.clone(),
            has_video,
            connecting_at: None,
            connected_at: None,
            ended_at: None,
            events: Vec::new(),
        };

        call.record_event(CallEvent::Initiated(CallInitiated {
            base: CallEventBase::new(id),
            handle,
            direction: CallDirection::Outgoing,
            has_video,
        }));

        call
    }

    /// Create a new incoming call in `Connecting` (ringing) state
    ///
    /// Incoming calls are only registered once the system has accepted the
    /// announcement, so they start connecting immediately.
    pub fn incoming(id: CallId, handle: Handle, has_video: bool) -> Self {
        let mut call = Self {
            id,
            state: CallState::Connecting,
            direction: CallDirection::Incoming,
            handle: handle.clone(),
            has_video,
            connecting_at: Some(Utc::now()),
            connected_at: None,
            ended_at: None,
            events: Vec::new(),
        };

        call.record_event(CallEvent::Ringing(CallRinging {
            base: CallEventBase::new(id),
            handle,
            has_video,
        }));

        call
    }

    /// Transport accepted the outgoing call; start connecting
    pub fn start_connecting(&mut self) -> Result<DateTime<Utc>> {
        self.transition_to(CallState::Connecting)?;
        let connecting_at = Utc::now();
        self.connecting_at = Some(connecting_at);

        self.record_event(CallEvent::Connecting(CallConnecting {
            base: CallEventBase::new(self.id),
            connecting_at,
        }));

        Ok(connecting_at)
    }

    /// Media path established
    pub fn connect(&mut self) -> Result<DateTime<Utc>> {
        self.transition_to(CallState::Connected)?;
        let connected_at = Utc::now();
        self.connected_at = Some(connected_at);

        self.record_event(CallEvent::Connected(CallConnected {
            base: CallEventBase::new(self.id),
            connected_at,
        }));

        Ok(connected_at)
    }

    /// Put the call on hold
    pub fn hold(&mut self) -> Result<()> {
        self.transition_to(CallState::Held)?;

        self.record_event(CallEvent::Held(CallHeld {
            base: CallEventBase::new(self.id),
        }));

        Ok(())
    }

    /// Resume the call from hold
    pub fn resume(&mut self) -> Result<()> {
        if !matches!(self.state, CallState::Held) {
            return Err(CallError::InvalidTransition(
                "Can only resume from Held state".to_string(),
            ));
        }

        self.transition_to(CallState::Connected)?;

        self.record_event(CallEvent::Resumed(CallResumed {
            base: CallEventBase::new(self.id),
        }));

        Ok(())
    }

    /// End the call
    pub fn end(&mut self, reason: EndReason) -> Result<()> {
        self.transition_to(CallState::Ended(reason.clone()))?;
        let ended_at = Utc::now();
        self.ended_at = Some(ended_at);

        let duration_seconds = self
            .connected_at
            .map(|connected| (ended_at - connected).num_seconds());

        self.record_event(CallEvent::Ended(CallEnded {
            base: CallEventBase::new(self.id),
            reason,
            ended_at,
            duration_seconds,
        }));

        Ok(())
    }

    /// Transition to a new state
    fn transition_to(&mut self, new_state: CallState) -> Result<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(CallError::InvalidTransition(format!(
                "Cannot transition from {:?} to {:?}",
                self.state, new_state
            )));
        }

        self.state = new_state;
        Ok(())
    }

    /// Record a lifecycle event
    fn record_event(&mut self, event: CallEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn take_events(&mut self) -> Vec<CallEvent> {
        std::mem::take(&mut self.events)
    }

    // Getters
    pub fn id(&self) -> &CallId {
        &self.id
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    pub fn direction(&self) -> &CallDirection {
        &self.direction
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn has_video(&self) -> bool {
        self.has_video
    }

    pub fn connecting_at(&self) -> Option<&DateTime<Utc>> {
        self.connecting_at.as_ref()
    }

    pub fn connected_at(&self) -> Option<&DateTime<Utc>> {
        self.connected_at.as_ref()
    }

    pub fn ended_at(&self) -> Option<&DateTime<Utc>> {
        self.ended_at.as_ref()
    }

    /// Hold is only meaningful for an established call
    pub fn is_on_hold(&self) -> bool {
        matches!(self.state, CallState::Held)
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outgoing_call() -> Call {
        Call::outgoing(CallId::new(), Handle::phone("+15551234567"), false)
    }

    #[test]
    fn test_outgoing_call_lifecycle() {
        let mut call = outgoing_call();

        assert!(matches!(call.state(), CallState::Initiating));
        assert_eq!(call.events.len(), 1); // Initiated event

        call.start_connecting().unwrap();
        assert!(matches!(call.state(), CallState::Connecting));
        assert!(call.connecting_at().is_some());

        call.connect().unwrap();
        assert!(matches!(call.state(), CallState::Connected));
        assert!(call.connected_at().is_some());

        call.hold().unwrap();
        assert!(call.is_on_hold());

        call.resume().unwrap();
        assert!(matches!(call.state(), CallState::Connected));
        assert!(!call.is_on_hold());

        call.end(EndReason::NormalClearing).unwrap();
        assert!(matches!(call.state(), CallState::Ended(_)));
        assert!(call.ended_at().is_some());

        let events = call.take_events();
        assert_eq!(events.len(), 6); // Initiated, Connecting, Connected, Held, Resumed, Ended
    }

    #[test]
    fn test_incoming_call_starts_ringing() {
        let mut call = Call::incoming(CallId::new(), Handle::email("alice@example.com"), true);

        assert!(matches!(call.state(), CallState::Connecting));
        assert!(call.connecting_at().is_some());
        assert!(call.has_video());

        call.connect().unwrap();
        assert!(call.connected_at().is_some());
    }

    #[test]
    fn test_connected_at_only_after_connecting_at() {
        let mut call = outgoing_call();

        // Connect straight from Initiating is rejected
        assert!(call.connect().is_err());
        assert!(call.connected_at().is_none());

        call.start_connecting().unwrap();
        call.connect().unwrap();
        assert!(call.connecting_at().unwrap() <= call.connected_at().unwrap());
    }

    #[test]
    fn test_hold_while_connecting_is_invalid() {
        let mut call = outgoing_call();
        call.start_connecting().unwrap();

        assert!(matches!(
            call.hold(),
            Err(CallError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_cannot_transition_from_ended() {
        let mut call = outgoing_call();
        call.end(EndReason::Canceled).unwrap();

        assert!(call.start_connecting().is_err());
        assert!(call.connect().is_err());
        assert!(call.hold().is_err());
        assert!(call.end(EndReason::NormalClearing).is_err());
    }

    #[test]
    fn test_end_without_connect_has_no_duration() {
        let mut call = outgoing_call();
        call.end(EndReason::Rejected).unwrap();

        let events = call.take_events();
        let ended = events
            .iter()
            .find_map(|e| match e {
                CallEvent::Ended(ended) => Some(ended),
                _ => None,
            })
            .unwrap();
        assert!(ended.duration_seconds.is_none());
    }
}
