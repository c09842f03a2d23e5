//! Reservation booking: admission, lifecycle and expiry

pub mod capacity;
pub mod conflict;
pub mod expiry;
mod locks;
pub mod policy;
pub mod service;

#[cfg(test)]
mod tests;

pub use capacity::CapacitySnapshot;
pub use expiry::{start_expiration_task, ExpirationSweeper};
pub use policy::BookingPolicyService;
pub use service::{BookingSettings, ReservationService};
