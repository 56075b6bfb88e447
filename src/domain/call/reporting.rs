//! System call reporting port
//!
//! Outbound half of the telephony integration: announces calls and state
//! changes to the operating system's call UI.

use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{CallId, Handle};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Port to the OS-level call reporting facility
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemCallReporter: Send + Sync {
    /// Ask the system to surface an incoming-call UI and ring
    ///
    /// Fallible: the system may refuse (call limit, Do-Not-Disturb).
    async fn report_new_incoming_call(
        &self,
        id: CallId,
        handle: Handle,
        has_video: bool,
    ) -> Result<()>;

    /// Outgoing call started connecting; fire-and-forget
    async fn report_outgoing_started_connecting(
        &self,
        id: CallId,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Outgoing call connected; fire-and-forget
    async fn report_outgoing_connected(&self, id: CallId, at: DateTime<Utc>) -> Result<()>;
}
