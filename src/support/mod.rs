//! Cross-cutting plumbing: errors, clock, metrics, shutdown

pub mod errors;
pub mod metrics;
pub mod shutdown;
pub mod time;
