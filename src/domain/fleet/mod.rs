//! Fleet aggregate
//!
//! Jetski models (bookable unit) and the physical jetskis behind them.

pub mod model;
pub mod repository;

pub use model::{Jetski, JetskiModel, JetskiStatus};
pub use repository::FleetRegistry;
