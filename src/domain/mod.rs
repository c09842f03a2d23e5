//! Domain layer: entities, value types and collaborator interfaces.

pub mod billing;
pub mod customer;
pub mod fleet;
pub mod policy;
pub mod repositories;
pub mod reservation;
pub mod window;

// Re-export commonly used types
pub use billing::UsageCharge;
pub use customer::{Customer, CustomerRegistry};
pub use fleet::{FleetRegistry, Jetski, JetskiModel, JetskiStatus};
pub use policy::{BookingPolicy, BookingPolicyRepository, PolicyUpdate};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    NewReservation, PriorityTier, Reservation, ReservationPatch, ReservationRepository,
    ReservationStatus,
};
pub use window::TimeWindow;

// Re-export DomainError from support for convenience
pub use crate::support::errors::DomainError;
