//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    BookingPolicyRepository, CustomerRegistry, FleetRegistry, RepositoryProvider,
    ReservationRepository,
};

use super::customer_repository::SeaOrmCustomerRegistry;
use super::fleet_repository::SeaOrmFleetRegistry;
use super::policy_repository::SeaOrmBookingPolicyRepository;
use super::reservation_repository::SeaOrmReservationRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let units = repos.fleet().count_available_jetskis(tenant_id, model_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    reservations: SeaOrmReservationRepository,
    policies: SeaOrmBookingPolicyRepository,
    fleet: SeaOrmFleetRegistry,
    customers: SeaOrmCustomerRegistry,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            reservations: SeaOrmReservationRepository::new(db.clone()),
            policies: SeaOrmBookingPolicyRepository::new(db.clone()),
            fleet: SeaOrmFleetRegistry::new(db.clone()),
            customers: SeaOrmCustomerRegistry::new(db),
        }
    }

    /// Concrete fleet registry, for seeding.
    pub fn fleet_registry(&self) -> &SeaOrmFleetRegistry {
        &self.fleet
    }

    /// Concrete customer registry, for seeding.
    pub fn customer_registry(&self) -> &SeaOrmCustomerRegistry {
        &self.customers
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn policies(&self) -> &dyn BookingPolicyRepository {
        &self.policies
    }

    fn fleet(&self) -> &dyn FleetRegistry {
        &self.fleet
    }

    fn customers(&self) -> &dyn CustomerRegistry {
        &self.customers
    }
}
