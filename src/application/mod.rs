//! Application layer: use-case services over the domain collaborators

pub mod booking;
pub mod checkout;

pub use booking::{
    start_expiration_task, BookingPolicyService, BookingSettings, CapacitySnapshot,
    ExpirationSweeper, ReservationService,
};
pub use checkout::CheckoutService;
