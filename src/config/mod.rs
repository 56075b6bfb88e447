//! Provider configuration

use crate::domain::shared::value_objects::HandleKind;
use serde::{Deserialize, Serialize};

/// Fallback ringtone when the user has not picked one
pub const DEFAULT_RINGTONE: &str = "ringing_from_them_long.caf";

/// Read-only settings port, queried once per configuration build
pub trait SettingsProvider: Send + Sync {
    /// User-selected ringtone sound, if any
    fn ringtone_sound(&self) -> Option<String>;

    /// Whether the user has disabled system call integration
    fn calling_disabled(&self) -> bool;
}

/// Immutable capabilities of the telephony integration layer
///
/// Built once at startup from user settings; read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfiguration {
    /// Name shown by the system call UI
    pub localized_name: String,
    pub supports_video: bool,
    /// The integration layer handles one concurrent call
    pub max_concurrent_calls: usize,
    pub supported_handle_types: Vec<HandleKind>,
    pub ringtone_sound: String,
    /// User opted out of system call integration
    pub calling_disabled: bool,
}

impl ProviderConfiguration {
    pub fn from_settings(localized_name: impl Into<String>, settings: &dyn SettingsProvider) -> Self {
        Self {
            localized_name: localized_name.into(),
            supports_video: true,
            max_concurrent_calls: 1,
            supported_handle_types: vec![HandleKind::PhoneNumber, HandleKind::EmailAddress],
            ringtone_sound: settings
                .ringtone_sound()
                .unwrap_or_else(|| DEFAULT_RINGTONE.to_string()),
            calling_disabled: settings.calling_disabled(),
        }
    }
}
