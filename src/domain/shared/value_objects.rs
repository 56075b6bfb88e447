//! Shared value objects used across bounded contexts

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Call identifier
///
/// Globally unique for the lifetime of a call attempt; never reused once
/// the call reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote-party handle value object
///
/// Opaque to this subsystem; the kind only tells the system call UI how to
/// render it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    kind: HandleKind,
    value: String,
}

/// Kind of remote-party handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    PhoneNumber,
    EmailAddress,
    Generic,
}

impl Handle {
    pub fn new(kind: HandleKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn phone(value: impl Into<String>) -> Self {
        Self::new(HandleKind::PhoneNumber, value)
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self::new(HandleKind::EmailAddress, value)
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
