//! Customer aggregate (existence checks only)

pub mod model;
pub mod repository;

pub use model::Customer;
pub use repository::CustomerRegistry;
