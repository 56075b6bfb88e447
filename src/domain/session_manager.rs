//! Call session manager
//!
//! Owns the per-call state machine, validates and applies actions, invokes
//! the signaling transport and keeps the registry, the audio session and
//! the system call reporting in step. Inbound system actions and local user
//! actions funnel through the same operations, so both sides execute
//! identical transition logic.
//!
//! All registry mutation goes through [`CallRegistry::modify`], which
//! serializes mutations per identifier. The registry lock is never held
//! across a transport or reporter await; continuations re-enter the lock
//! and re-validate state, so out-of-order events (a `connected` arriving
//! after an `end`) are detected and dropped instead of corrupting state.

use crate::config::ProviderConfiguration;
use crate::domain::audio::AudioSessionCoordinator;
use crate::domain::call::entity::Call;
use crate::domain::call::event::{CallEvent, CallObserver};
use crate::domain::call::registry::CallRegistry;
use crate::domain::call::reporting::SystemCallReporter;
use crate::domain::call::transport::{SignalingTransport, VoiceChannel};
use crate::domain::call::value_object::{CallDirection, CallState, EndReason};
use crate::domain::shared::error::CallError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, Handle};
use std::sync::Arc;
use std::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Orchestrates call lifecycle, audio and system reporting
pub struct CallSessionManager {
    config: ProviderConfiguration,
    registry: CallRegistry,
    audio: AudioSessionCoordinator,
    transport: Arc<dyn SignalingTransport>,
    voice_channel: Arc<dyn VoiceChannel>,
    reporter: Arc<dyn SystemCallReporter>,
    observers: RwLock<Vec<Arc<dyn CallObserver>>>,
}

impl CallSessionManager {
    /// Create the single long-lived manager instance
    ///
    /// Constructed once at application start and handed by reference to
    /// every component that needs it.
    pub fn new(
        config: ProviderConfiguration,
        transport: Arc<dyn SignalingTransport>,
        voice_channel: Arc<dyn VoiceChannel>,
        reporter: Arc<dyn SystemCallReporter>,
    ) -> Self {
        Self {
            config,
            registry: CallRegistry::new(),
            audio: AudioSessionCoordinator::new(),
            transport,
            voice_channel,
            reporter,
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &ProviderConfiguration {
        &self.config
    }

    pub fn audio(&self) -> &AudioSessionCoordinator {
        &self.audio
    }

    /// Register an observer for call lifecycle events
    pub fn add_observer(&self, observer: Arc<dyn CallObserver>) {
        self.observers.write().unwrap().push(observer);
    }

    fn notify_all(&self, events: &[CallEvent]) {
        let observers = self.observers.read().unwrap();
        for event in events {
            for observer in observers.iter() {
                observer.on_call_event(event);
            }
        }
    }

    /// Start an outgoing call
    ///
    /// The identifier is reserved in the registry before the transport is
    /// invoked, so a concurrent `end_call` can record terminal intent; the
    /// continuation re-checks the reservation and drops a stale result.
    pub async fn start_call(&self, id: CallId, handle: Handle, has_video: bool) -> Result<()> {
        // Prepare the audio session up front; audio output itself waits
        // for system activation.
        self.audio.configure_session();

        let mut call = Call::outgoing(id, handle.clone(), has_video);
        let events = call.take_events();
        self.registry.add(call).await?;
        self.notify_all(&events);
        info!(call_id = %id, "Outgoing call starting");

        match self.transport.start_call(id, handle, has_video).await {
            Ok(()) => {
                let connecting = self
                    .registry
                    .modify(&id, |call| {
                        let at = call.start_connecting()?;
                        self.notify_all(&call.take_events());
                        Ok(at)
                    })
                    .await;

                match connecting {
                    Ok(connecting_at) => {
                        if let Err(e) = self
                            .reporter
                            .report_outgoing_started_connecting(id, connecting_at)
                            .await
                        {
                            error!(call_id = %id, "Cannot report started connecting: {e}");
                        }
                        Ok(())
                    }
                    Err(CallError::UnknownCall(_)) => {
                        // Ended while the transport call was in flight; the
                        // call is already gone locally, tear down remotely.
                        warn!(call_id = %id, "Call ended before transport start completed");
                        self.end_transport_best_effort(id);
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => {
                warn!(call_id = %id, "Transport failed to start call: {e}");
                self.finish_locally(&id, EndReason::Failed(e.to_string())).await;
                Err(e)
            }
        }
    }

    /// Transport reported the call as connected
    ///
    /// A stale report (call already ended, or never in `Connecting`) is
    /// dropped; the call is terminal and no one is waiting.
    pub async fn handle_connected(&self, id: CallId) {
        let result = self
            .registry
            .modify(&id, |call| {
                let at = call.connect()?;
                self.notify_all(&call.take_events());
                Ok((at, *call.direction()))
            })
            .await;

        match result {
            Ok((connected_at, CallDirection::Outgoing)) => {
                info!(call_id = %id, "Call connected");
                if let Err(e) = self.reporter.report_outgoing_connected(id, connected_at).await {
                    error!(call_id = %id, "Cannot report connected: {e}");
                }
            }
            Ok((_, CallDirection::Incoming)) => {
                info!(call_id = %id, "Call connected");
            }
            Err(e) => {
                warn!(call_id = %id, "Dropping stale connected event: {e}");
            }
        }
    }

    /// Announce an incoming call to the system
    ///
    /// On reporting failure the conversation-level resource is left before
    /// the error surfaces; a call that cannot be reported must not remain
    /// half-registered.
    pub async fn announce_incoming(&self, id: CallId, handle: Handle, has_video: bool) -> Result<()> {
        if self.registry.contains(&id).await {
            return Err(CallError::DuplicateCall(id));
        }

        if let Err(e) = self
            .reporter
            .report_new_incoming_call(id, handle.clone(), has_video)
            .await
        {
            error!(call_id = %id, "Cannot report incoming call: {e}");
            self.voice_channel.leave(id).await;
            return Err(e);
        }

        let mut call = Call::incoming(id, handle, has_video);
        let events = call.take_events();
        if let Err(e) = self.registry.add(call).await {
            self.voice_channel.leave(id).await;
            return Err(e);
        }
        self.notify_all(&events);
        info!(call_id = %id, "Incoming call ringing");
        Ok(())
    }

    /// Answer a ringing incoming call
    ///
    /// On transport failure the call stays registered so the user may
    /// retry.
    pub async fn answer_call(&self, id: CallId) -> Result<()> {
        let call = self
            .registry
            .get(&id)
            .await
            .ok_or(CallError::UnknownCall(id))?;

        if !matches!(call.direction(), CallDirection::Incoming)
            || !matches!(call.state(), CallState::Connecting)
        {
            return Err(CallError::InvalidTransition(format!(
                "Cannot answer {:?} call in state {:?}",
                call.direction(),
                call.state()
            )));
        }

        self.audio.configure_session();

        match self.transport.answer_call(id).await {
            Ok(()) => {
                let result = self
                    .registry
                    .modify(&id, |call| {
                        call.connect()?;
                        self.notify_all(&call.take_events());
                        Ok(())
                    })
                    .await;

                match result {
                    Ok(_) => {
                        info!(call_id = %id, "Incoming call answered");
                        Ok(())
                    }
                    Err(CallError::UnknownCall(_)) => {
                        // Ended while answering; already terminal, absorb.
                        warn!(call_id = %id, "Call ended before answer completed");
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => {
                warn!(call_id = %id, "Transport failed to answer call: {e}");
                Err(e)
            }
        }
    }

    /// End a call
    ///
    /// Local state is authoritative for the system UI: the call is removed
    /// and the operation succeeds whether or not the transport confirms.
    /// The transport teardown runs best-effort in the background.
    pub async fn end_call(&self, id: CallId) -> Result<()> {
        if !self.registry.contains(&id).await {
            return Err(CallError::UnknownCall(id));
        }

        self.audio.stop_audio();
        self.finish_locally(&id, EndReason::NormalClearing).await;
        self.end_transport_best_effort(id);
        info!(call_id = %id, "Call ended");
        Ok(())
    }

    /// Put a call on hold or resume it
    ///
    /// Only valid for an established call; hold while still connecting is
    /// an invalid transition. Already being in the target hold state is a
    /// no-op.
    pub async fn set_held(&self, id: CallId, on_hold: bool) -> Result<()> {
        self.registry
            .modify(&id, |call| {
                if !matches!(call.state(), CallState::Connected | CallState::Held) {
                    return Err(CallError::InvalidTransition(format!(
                        "Cannot change hold in state {:?}",
                        call.state()
                    )));
                }
                if call.is_on_hold() == on_hold {
                    return Ok(());
                }
                if on_hold {
                    call.hold()?;
                } else {
                    call.resume()?;
                }
                self.notify_all(&call.take_events());
                Ok(())
            })
            .await?;

        if on_hold {
            self.audio.stop_audio();
            info!(call_id = %id, "Call placed on hold");
        } else {
            if let Err(e) = self.audio.start_audio() {
                warn!(call_id = %id, "Audio not restarted on resume: {e}");
            }
            info!(call_id = %id, "Call resumed");
        }
        Ok(())
    }

    /// Integration layer reset: drop every call locally
    pub async fn reset(&self) {
        warn!("Provider reset; leaving all active calls");
        for call in self.registry.all().await {
            let id = *call.id();
            self.finish_locally(&id, EndReason::Reset).await;
            self.voice_channel.leave(id).await;
        }
        self.audio.stop_audio();
    }

    /// System activated the audio session; start call audio
    pub fn handle_audio_activated(&self) {
        self.audio.handle_activated();
        if let Err(e) = self.audio.start_audio() {
            warn!("Audio not started on activation: {e}");
        }
    }

    /// System deactivated the audio session
    pub fn handle_audio_deactivated(&self) {
        self.audio.handle_deactivated();
    }

    /// Snapshot of a single call
    pub async fn call(&self, id: &CallId) -> Option<Call> {
        self.registry.get(id).await
    }

    /// Snapshot of all in-flight calls
    pub async fn active_calls(&self) -> Vec<Call> {
        self.registry.all().await
    }

    /// Apply the terminal transition and remove the call from the registry
    ///
    /// Tolerates an already-absent call; removal happens exactly once.
    async fn finish_locally(&self, id: &CallId, reason: EndReason) {
        let result = self
            .registry
            .modify(id, |call| {
                call.end(reason.clone())?;
                self.notify_all(&call.take_events());
                Ok(())
            })
            .await;

        match result {
            Ok(_) => {
                self.registry.remove(id).await;
            }
            Err(e) => {
                debug!(call_id = %id, "Call already terminal: {e}");
            }
        }
    }

    fn end_transport_best_effort(&self, id: CallId) {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(e) = transport.end_call(id).await {
                warn!(call_id = %id, "Transport end failed (ignored): {e}");
            }
        });
    }
}
