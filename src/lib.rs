//! # Jetski Booking Engine
//!
//! Reservation and capacity engine for a jetski rental operation.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Entities, value types and collaborator traits
//! - **application**: Capacity oracle, conflict detector, reservation
//!   lifecycle, expiration sweeper, policy and checkout services
//! - **infrastructure**: In-memory and SeaORM repository providers
//! - **support**: Errors, clock, metrics and shutdown plumbing
//! - **server**: Runtime bootstrap shared by both binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
