//! Database entities module

pub mod booking_policy;
pub mod customer;
pub mod jetski;
pub mod jetski_model;
pub mod reservation;

pub use booking_policy::Entity as BookingPolicy;
pub use customer::Entity as Customer;
pub use jetski::Entity as Jetski;
pub use jetski_model::Entity as JetskiModel;
pub use reservation::Entity as Reservation;
