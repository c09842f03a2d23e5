//! In-memory storage implementation
//!
//! Backs every collaborator trait with `DashMap`s. Used by the test suites and
//! by the database-less development mode.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{
    BookingPolicy, BookingPolicyRepository, Customer, CustomerRegistry, DomainError,
    DomainResult, FleetRegistry, Jetski, JetskiModel, JetskiStatus, PriorityTier,
    RepositoryProvider, Reservation, ReservationRepository, TimeWindow,
};

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    models: DashMap<Uuid, JetskiModel>,
    jetskis: DashMap<Uuid, Jetski>,
    customers: DashMap<Uuid, Customer>,
    policies: DashMap<Uuid, BookingPolicy>,
    reservations: DashMap<Uuid, Reservation>,
    /// Serializes reservation writes so the jetski overlap check and the
    /// insert happen as one step.
    write_gate: Mutex<()>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ────────────────────────────────────────────────

    pub fn add_model(&self, model: JetskiModel) -> Uuid {
        let id = model.id;
        self.models.insert(id, model);
        id
    }

    pub fn add_jetski(&self, jetski: Jetski) -> Uuid {
        let id = jetski.id;
        self.jetskis.insert(id, jetski);
        id
    }

    pub fn set_jetski_status(&self, jetski_id: Uuid, status: JetskiStatus) -> DomainResult<()> {
        let mut jetski = self
            .jetskis
            .get_mut(&jetski_id)
            .ok_or_else(|| DomainError::not_found("Jetski", "id", jetski_id))?;
        jetski.status = status;
        Ok(())
    }

    pub fn add_customer(&self, customer: Customer) -> Uuid {
        let id = customer.id;
        self.customers.insert(id, customer);
        id
    }

    fn write_reservation(&self, reservation: Reservation, must_exist: bool) -> DomainResult<()> {
        let _gate = self
            .write_gate
            .lock()
            .map_err(|_| DomainError::Storage("reservation write gate poisoned".to_string()))?;

        let exists = self.reservations.contains_key(&reservation.id);
        if must_exist && !exists {
            return Err(DomainError::not_found("Reservation", "id", reservation.id));
        }
        if !must_exist && exists {
            return Err(DomainError::Conflict(format!(
                "reservation {} already exists",
                reservation.id
            )));
        }

        if let (Some(jetski_id), true) = (reservation.jetski_id, reservation.holds_capacity()) {
            let window = reservation.window();
            let clash = self.reservations.iter().find(|r| {
                r.id != reservation.id
                    && r.tenant_id == reservation.tenant_id
                    && r.jetski_id == Some(jetski_id)
                    && r.holds_capacity()
                    && r.window().overlaps(&window)
            });
            if let Some(existing) = clash {
                return Err(DomainError::Conflict(format!(
                    "jetski {jetski_id} already held by reservation {} for {}",
                    existing.id,
                    existing.window()
                )));
            }
        }

        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRepositoryProvider {
    async fn save(&self, reservation: Reservation) -> DomainResult<()> {
        self.write_reservation(reservation, false)
    }

    async fn update(&self, reservation: Reservation) -> DomainResult<()> {
        self.write_reservation(reservation, true)
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Option<Reservation>> {
        Ok(self
            .reservations
            .get(&id)
            .filter(|r| r.tenant_id == tenant_id)
            .map(|r| r.clone()))
    }

    async fn find_by_model(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.model_id == model_id)
            .map(|r| r.clone())
            .collect();
        found.sort_by_key(|r| r.start);
        Ok(found)
    }

    async fn count_overlapping(
        &self,
        tenant_id: Uuid,
        model_id: Uuid,
        window: TimeWindow,
        tier: Option<PriorityTier>,
    ) -> DomainResult<u32> {
        let count = self
            .reservations
            .iter()
            .filter(|r| {
                r.tenant_id == tenant_id
                    && r.model_id == model_id
                    && r.holds_capacity()
                    && tier.map_or(true, |t| r.priority == t)
                    && r.window().overlaps(&window)
            })
            .count();
        Ok(count as u32)
    }

    async fn find_jetski_conflicts(
        &self,
        tenant_id: Uuid,
        jetski_id: Uuid,
        window: TimeWindow,
        exclude: Option<Uuid>,
    ) -> DomainResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| {
                r.tenant_id == tenant_id
                    && r.jetski_id == Some(jetski_id)
                    && Some(r.id) != exclude
                    && r.holds_capacity()
                    && r.window().overlaps(&window)
            })
            .map(|r| r.clone())
            .collect();
        found.sort_by_key(|r| r.start);
        Ok(found)
    }

    async fn find_expirable(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.is_expirable_at(now))
            .map(|r| r.clone())
            .collect();
        found.sort_by_key(|r| r.expires_at);
        Ok(found)
    }
}

#[async_trait]
impl BookingPolicyRepository for InMemoryRepositoryProvider {
    async fn find(&self, tenant_id: Uuid) -> DomainResult<Option<BookingPolicy>> {
        Ok(self.policies.get(&tenant_id).map(|p| p.clone()))
    }

    async fn save(&self, policy: BookingPolicy) -> DomainResult<()> {
        self.policies.insert(policy.tenant_id, policy);
        Ok(())
    }
}

#[async_trait]
impl FleetRegistry for InMemoryRepositoryProvider {
    async fn get_model(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<Option<JetskiModel>> {
        Ok(self
            .models
            .get(&model_id)
            .filter(|m| m.tenant_id == tenant_id)
            .map(|m| m.clone()))
    }

    async fn get_jetski(&self, tenant_id: Uuid, jetski_id: Uuid) -> DomainResult<Option<Jetski>> {
        Ok(self
            .jetskis
            .get(&jetski_id)
            .filter(|j| j.tenant_id == tenant_id)
            .map(|j| j.clone()))
    }

    async fn count_available_jetskis(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<u32> {
        let count = self
            .jetskis
            .iter()
            .filter(|j| j.tenant_id == tenant_id && j.model_id == model_id && j.is_bookable())
            .count();
        Ok(count as u32)
    }
}

#[async_trait]
impl CustomerRegistry for InMemoryRepositoryProvider {
    async fn get_customer(&self, tenant_id: Uuid, customer_id: Uuid) -> DomainResult<Option<Customer>> {
        Ok(self
            .customers
            .get(&customer_id)
            .filter(|c| c.tenant_id == tenant_id)
            .map(|c| c.clone()))
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn policies(&self) -> &dyn BookingPolicyRepository {
        self
    }

    fn fleet(&self) -> &dyn FleetRegistry {
        self
    }

    fn customers(&self) -> &dyn CustomerRegistry {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    use crate::domain::NewReservation;

    struct Seed {
        storage: InMemoryRepositoryProvider,
        tenant: Uuid,
        model: Uuid,
        jetski: Uuid,
    }

    fn seed() -> Seed {
        let storage = InMemoryRepositoryProvider::new();
        let tenant = Uuid::new_v4();
        let model = storage.add_model(JetskiModel::new(tenant, "Sea-Doo GTI", dec!(150), 5));
        let jetski = storage.add_jetski(Jetski::new(tenant, model, "JS-01"));
        Seed {
            storage,
            tenant,
            model,
            jetski,
        }
    }

    fn reservations(seed: &Seed) -> &dyn ReservationRepository {
        &seed.storage
    }

    fn booking(seed: &Seed, start_h: i64, end_h: i64, jetski: bool) -> Reservation {
        let base = Utc::now() + Duration::days(1);
        let mut req = NewReservation::new(
            seed.tenant,
            seed.model,
            Uuid::new_v4(),
            base + Duration::hours(start_h),
            base + Duration::hours(end_h),
        );
        if jetski {
            req = req.with_jetski(seed.jetski);
        }
        Reservation::from_request(req, 30, Utc::now())
    }

    #[tokio::test]
    async fn backstop_rejects_overlap_on_same_jetski() {
        let s = seed();
        reservations(&s).save(booking(&s, 0, 2, true)).await.unwrap();
        let err = reservations(&s).save(booking(&s, 1, 3, true)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Unbound reservations are governed by capacity, not the backstop.
        reservations(&s).save(booking(&s, 1, 3, false)).await.unwrap();
    }

    #[tokio::test]
    async fn closed_reservation_releases_jetski() {
        let s = seed();
        let mut first = booking(&s, 0, 2, true);
        reservations(&s).save(first.clone()).await.unwrap();
        first.cancel(Utc::now()).unwrap();
        reservations(&s).update(first).await.unwrap();

        reservations(&s).save(booking(&s, 0, 2, true)).await.unwrap();
    }

    #[tokio::test]
    async fn update_of_unknown_reservation_is_not_found() {
        let s = seed();
        let err = reservations(&s).update(booking(&s, 0, 1, false)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn counts_by_tier_and_overlap() {
        let s = seed();
        let paid = {
            let base = Utc::now() + Duration::days(1);
            let req = NewReservation::new(s.tenant, s.model, Uuid::new_v4(), base, base + Duration::hours(2))
                .with_deposit(dec!(45));
            Reservation::from_request(req, 30, Utc::now())
        };
        let window = paid.window();
        reservations(&s).save(paid).await.unwrap();
        reservations(&s).save(booking(&s, 1, 3, false)).await.unwrap();
        reservations(&s).save(booking(&s, 2, 4, false)).await.unwrap(); // touches end, no overlap

        let repo = reservations(&s);
        assert_eq!(repo.count_overlapping(s.tenant, s.model, window, None).await.unwrap(), 2);
        assert_eq!(
            repo.count_overlapping(s.tenant, s.model, window, Some(PriorityTier::Guaranteed))
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            repo.count_overlapping(Uuid::new_v4(), s.model, window, None).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn available_units_exclude_maintenance_and_inactive() {
        let s = seed();
        let second = s.storage.add_jetski(Jetski::new(s.tenant, s.model, "JS-02"));
        let mut retired = Jetski::new(s.tenant, s.model, "JS-03");
        retired.active = false;
        s.storage.add_jetski(retired);

        assert_eq!(s.storage.count_available_jetskis(s.tenant, s.model).await.unwrap(), 2);
        s.storage
            .set_jetski_status(second, JetskiStatus::Maintenance)
            .unwrap();
        assert_eq!(s.storage.count_available_jetskis(s.tenant, s.model).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn other_tenant_cannot_read_records() {
        let s = seed();
        let r = booking(&s, 0, 1, false);
        let id = r.id;
        reservations(&s).save(r).await.unwrap();

        assert!(reservations(&s).find_by_id(s.tenant, id).await.unwrap().is_some());
        assert!(reservations(&s).find_by_id(Uuid::new_v4(), id).await.unwrap().is_none());
        assert!(s.storage.get_model(Uuid::new_v4(), s.model).await.unwrap().is_none());
    }
}
