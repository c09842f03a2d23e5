//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{PriorityTier, Reservation};
use crate::domain::window::TimeWindow;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a new reservation.
    ///
    /// Fails with `DomainError::Conflict` if the reservation is bound to a
    /// jetski that another active reservation holds for an overlapping window.
    async fn save(&self, reservation: Reservation) -> DomainResult<()>;

    /// Replace an existing reservation. Same jetski backstop as `save`.
    async fn update(&self, reservation: Reservation) -> DomainResult<()>;

    /// Find reservation by ID within a tenant
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Option<Reservation>>;

    /// All reservations of a model (any status), ordered by start
    async fn find_by_model(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<Vec<Reservation>>;

    /// Count active, open reservations of a model overlapping `window`.
    /// `tier = None` counts both tiers.
    async fn count_overlapping(
        &self,
        tenant_id: Uuid,
        model_id: Uuid,
        window: TimeWindow,
        tier: Option<PriorityTier>,
    ) -> DomainResult<u32>;

    /// Active, open reservations bound to `jetski_id` overlapping `window`,
    /// excluding `exclude` (the reservation being updated).
    async fn find_jetski_conflicts(
        &self,
        tenant_id: Uuid,
        jetski_id: Uuid,
        window: TimeWindow,
        exclude: Option<Uuid>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Active, open, unpaid reservations with `expires_at < now`, across tenants.
    async fn find_expirable(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reservation>>;
}
