//! Call registry
//!
//! Concurrency-safe collection of in-flight calls; the single source of
//! truth for call existence. All business logic lives in the session
//! manager, the registry only stores and checks existence.

use crate::domain::call::entity::Call;
use crate::domain::shared::error::CallError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::CallId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Registry of in-flight calls, keyed by call identifier
#[derive(Clone)]
pub struct CallRegistry {
    calls: Arc<RwLock<HashMap<CallId, Call>>>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a call
    pub async fn add(&self, call: Call) -> Result<()> {
        let mut calls = self.calls.write().await;
        let id = *call.id();

        if calls.contains_key(&id) {
            return Err(CallError::DuplicateCall(id));
        }

        calls.insert(id, call);
        Ok(())
    }

    /// Get a point-in-time snapshot of a call
    pub async fn get(&self, id: &CallId) -> Option<Call> {
        let calls = self.calls.read().await;
        calls.get(id).cloned()
    }

    /// Remove a call, returning it if it was present
    ///
    /// Idempotent: removing an absent id is a no-op, so duplicate
    /// termination signals are tolerated.
    pub async fn remove(&self, id: &CallId) -> Option<Call> {
        let mut calls = self.calls.write().await;
        calls.remove(id)
    }

    /// Check whether a call is registered
    pub async fn contains(&self, id: &CallId) -> bool {
        let calls = self.calls.read().await;
        calls.contains_key(id)
    }

    /// Snapshot of all registered calls
    pub async fn all(&self) -> Vec<Call> {
        let calls = self.calls.read().await;
        calls.values().cloned().collect()
    }

    /// Apply a mutation to a registered call under the write lock
    ///
    /// This is the critical-section primitive: exactly one mutation per
    /// identifier is in flight at a time. Fails with `UnknownCall` for an
    /// absent id so stale continuations are detected by their callers.
    pub async fn modify<F, R>(&self, id: &CallId, f: F) -> Result<R>
    where
        F: FnOnce(&mut Call) -> Result<R>,
    {
        let mut calls = self.calls.write().await;
        let call = calls.get_mut(id).ok_or(CallError::UnknownCall(*id))?;
        f(call)
    }

    /// Total registered call count
    pub async fn count(&self) -> usize {
        let calls = self.calls.read().await;
        calls.len()
    }
}

impl Default for CallRegistry {
    fn default() -> Self {
        Self::new()
    }
}
