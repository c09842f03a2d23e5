//! Tenant booking policy
//!
//! Per-tenant constants consumed by the capacity and expiration rules.

pub mod model;
pub mod repository;

pub use model::{BookingPolicy, PolicyUpdate};
pub use repository::BookingPolicyRepository;
