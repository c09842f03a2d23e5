//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_jetski_models;
mod m20240101_000002_create_jetskis;
mod m20240101_000003_create_customers;
mod m20240101_000004_create_reservations;
mod m20240101_000005_create_booking_policies;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_jetski_models::Migration),
            Box::new(m20240101_000002_create_jetskis::Migration),
            Box::new(m20240101_000003_create_customers::Migration),
            Box::new(m20240101_000004_create_reservations::Migration),
            Box::new(m20240101_000005_create_booking_policies::Migration),
        ]
    }
}
