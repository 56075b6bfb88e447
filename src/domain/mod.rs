//! Domain layer - Core business logic and rules
//!
//! This layer contains:
//! - Entities: Objects with identity
//! - Value Objects: Immutable objects without identity
//! - Ports: Trait interfaces to the transport and reporting layers
//! - Domain Events: Things that happened in the domain

pub mod audio;
pub mod call;
pub mod session_manager;
pub mod shared;

// Re-export commonly used types
pub use session_manager::CallSessionManager;
pub use shared::{CallError, Result};
