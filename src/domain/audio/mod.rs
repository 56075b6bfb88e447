//! Audio bounded context - process-wide audio session coordination

pub mod coordinator;

pub use coordinator::AudioSessionCoordinator;
