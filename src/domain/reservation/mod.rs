//! Reservation aggregate
//!
//! Contains the Reservation entity, its lifecycle state machine, and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{NewReservation, PriorityTier, Reservation, ReservationPatch, ReservationStatus};
pub use repository::ReservationRepository;
