//! Call bounded context - manages the lifecycle of calls

pub mod entity;
pub mod event;
pub mod registry;
pub mod reporting;
pub mod transport;
pub mod value_object;

pub use entity::Call;
pub use event::{CallEvent, CallObserver};
pub use registry::CallRegistry;
pub use reporting::SystemCallReporter;
pub use transport::{SignalingTransport, VoiceChannel};
pub use value_object::{CallDirection, CallState, EndReason};
