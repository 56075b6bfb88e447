//! Infrastructure layer - Adapters to external facilities

pub mod telephony;
