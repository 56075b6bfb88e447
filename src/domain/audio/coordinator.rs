//! Audio session coordination
//!
//! Serializes call audio start/stop relative to the process-wide audio
//! session. The session is configured before use, but audio must not start
//! until the system has activated audio priority; ordering is enforced by
//! the session manager, this component only tracks and checks it.

use crate::domain::shared::error::CallError;
use crate::domain::shared::result::Result;
use std::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct AudioSessionState {
    /// Audio hardware prepared for call use
    configured: bool,
    /// System has granted audio priority
    activated: bool,
    /// Call audio is flowing
    running: bool,
}

/// Coordinates the single process-wide audio session
///
/// `start_audio`/`stop_audio` are idempotent; starting before the system
/// has activated the session is a diagnostic error, never fatal.
pub struct AudioSessionCoordinator {
    state: Mutex<AudioSessionState>,
}

impl AudioSessionCoordinator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AudioSessionState::default()),
        }
    }

    /// Prepare the audio hardware for call use
    ///
    /// Does not start audio output; that waits for system activation.
    pub fn configure_session(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.configured {
            state.configured = true;
            debug!("Audio session configured");
        }
    }

    /// System granted audio priority
    pub fn handle_activated(&self) {
        let mut state = self.state.lock().unwrap();
        state.activated = true;
        debug!("Audio session activated");
    }

    /// System revoked audio priority; any running audio is gone with it
    pub fn handle_deactivated(&self) {
        let mut state = self.state.lock().unwrap();
        state.activated = false;
        state.running = false;
        debug!("Audio session deactivated");
    }

    /// Start call audio
    ///
    /// No-op if already running. Returns `PrematureAudioStart` when called
    /// before activation; callers log it and continue.
    pub fn start_audio(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        if state.running {
            return Ok(());
        }
        if !state.activated {
            warn!("Audio start requested before session activation");
            return Err(CallError::PrematureAudioStart);
        }

        state.running = true;
        info!("Call audio started");
        Ok(())
    }

    /// Stop call audio; no-op if already stopped
    pub fn stop_audio(&self) {
        let mut state = self.state.lock().unwrap();
        if state.running {
            state.running = false;
            info!("Call audio stopped");
        }
    }

    pub fn is_configured(&self) -> bool {
        self.state.lock().unwrap().configured
    }

    pub fn is_activated(&self) -> bool {
        self.state.lock().unwrap().activated
    }

    pub fn is_audio_running(&self) -> bool {
        self.state.lock().unwrap().running
    }
}

impl Default for AudioSessionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
