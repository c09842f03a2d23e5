//! Reservation lifecycle service
//!
//! Every mutating operation takes the (tenant, model) lock, reloads the
//! reservation under it, runs its checks and writes once.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::capacity::{self, CapacitySnapshot};
use super::conflict;
use super::locks::ModelLocks;
use super::policy::BookingPolicyService;
use crate::domain::{
    BookingPolicy, DomainError, DomainResult, JetskiModel, JetskiStatus, NewReservation,
    PriorityTier, RepositoryProvider, Reservation, ReservationPatch, ReservationStatus, TimeWindow,
};
use crate::support::metrics;
use crate::support::time::Clock;

/// Runtime switches for admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSettings {
    /// Reject overbooked requests at creation once `floor(units × factor)`
    /// active reservations overlap the window.
    pub enforce_overbooking_cap_on_create: bool,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            enforce_overbooking_cap_on_create: true,
        }
    }
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    policies: BookingPolicyService,
    clock: Arc<dyn Clock>,
    locks: ModelLocks,
    settings: BookingSettings,
}

impl ReservationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: Arc<dyn Clock>,
        settings: BookingSettings,
    ) -> Self {
        Self {
            policies: BookingPolicyService::new(repos.clone()),
            repos,
            clock,
            locks: ModelLocks::new(),
            settings,
        }
    }

    pub fn policies(&self) -> &BookingPolicyService {
        &self.policies
    }

    pub fn settings(&self) -> BookingSettings {
        self.settings
    }

    // ── Queries ────────────────────────────────────────────────

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }

    pub async fn list_for_model(
        &self,
        tenant_id: Uuid,
        model_id: Uuid,
    ) -> DomainResult<Vec<Reservation>> {
        self.repos
            .reservations()
            .find_by_model(tenant_id, model_id)
            .await
    }

    /// Whether a reservation of the given kind would currently be admitted.
    pub async fn check_model_availability(
        &self,
        tenant_id: Uuid,
        model_id: Uuid,
        window: TimeWindow,
        with_deposit: bool,
    ) -> DomainResult<bool> {
        self.load_model(tenant_id, model_id).await?;
        let policy = self.policies.get_policy(tenant_id).await?;
        let snapshot = capacity::snapshot(self.repos.as_ref(), tenant_id, model_id, window).await?;
        Ok(snapshot.can_accept(PriorityTier::for_deposit(with_deposit), &policy))
    }

    // ── Creation ───────────────────────────────────────────────

    pub async fn create(&self, request: NewReservation) -> DomainResult<Reservation> {
        request.validate()?;
        let now = self.clock.now();
        if request.start < now {
            return Err(DomainError::Validation(format!(
                "reservation start {} is in the past",
                request.start.to_rfc3339()
            )));
        }
        let tenant_id = request.tenant_id;
        let window = TimeWindow::new(request.start, request.end)?;

        let model = self.load_model(tenant_id, request.model_id).await?;
        if !model.active {
            return Err(DomainError::Business(format!(
                "jetski model '{}' is inactive",
                model.name
            )));
        }
        let customer = self
            .repos
            .customers()
            .get_customer(tenant_id, request.customer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer", "id", request.customer_id))?;
        if !customer.active {
            return Err(DomainError::Business(format!(
                "customer {} is inactive",
                customer.id
            )));
        }

        let policy = self.policies.get_policy(tenant_id).await?;
        let _guard = self.locks.acquire(tenant_id, model.id).await;

        let snapshot = capacity::snapshot(self.repos.as_ref(), tenant_id, model.id, window).await?;
        if snapshot.total_units == 0 {
            metrics::capacity_rejected(PriorityTier::for_deposit(request.has_deposit()));
            return Err(DomainError::Business(format!(
                "no units available for model '{}'",
                model.name
            )));
        }

        let tier = PriorityTier::for_deposit(request.has_deposit());
        if !self.admits(tier, &snapshot, &policy) {
            metrics::capacity_rejected(tier);
            return Err(capacity_exhausted(tier, &model, &snapshot, &policy, &window));
        }

        if let Some(jetski_id) = request.jetski_id {
            self.ensure_jetski_usable(tenant_id, model.id, jetski_id, window, None)
                .await?;
        }

        let reservation = Reservation::from_request(request, policy.grace_period_minutes, now);
        self.repos.reservations().save(reservation.clone()).await?;

        metrics::reservation_created(tier);
        info!(
            reservation_id = %reservation.id,
            %tenant_id,
            model_id = %reservation.model_id,
            tier = %tier,
            window = %window,
            "Reservation created"
        );
        Ok(reservation)
    }

    // ── Transitions ────────────────────────────────────────────

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        patch: ReservationPatch,
    ) -> DomainResult<Reservation> {
        patch.validate()?;
        let now = self.clock.now();
        if let Some(start) = patch.start {
            if start < now {
                return Err(DomainError::Validation(format!(
                    "reservation start {} is in the past",
                    start.to_rfc3339()
                )));
            }
        }
        let (_guard, mut reservation) = self.load_locked(tenant_id, id).await?;

        let previous = reservation.window();
        let changes_window = patch.changes_window();
        reservation.apply_patch(patch, now)?;

        if changes_window {
            let window = reservation.window();
            if let Some(jetski_id) = reservation.jetski_id {
                conflict::ensure_no_conflict(
                    self.repos.as_ref(),
                    tenant_id,
                    jetski_id,
                    window,
                    Some(reservation.id),
                )
                .await?;
            }

            let model = self.load_model(tenant_id, reservation.model_id).await?;
            let policy = self.policies.get_policy(tenant_id).await?;
            let mut snapshot =
                capacity::snapshot(self.repos.as_ref(), tenant_id, model.id, window).await?;
            // The stored copy still holds its old window.
            if reservation.holds_capacity() && previous.overlaps(&window) {
                snapshot = snapshot.without(reservation.priority);
            }
            let tier = reservation.priority;
            if !self.admits(tier, &snapshot, &policy) {
                metrics::capacity_rejected(tier);
                return Err(capacity_exhausted(tier, &model, &snapshot, &policy, &window));
            }
        }

        self.repos.reservations().update(reservation.clone()).await?;
        info!(reservation_id = %id, %tenant_id, "Reservation updated");
        Ok(reservation)
    }

    pub async fn confirm(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Reservation> {
        let (_guard, mut reservation) = self.load_locked(tenant_id, id).await?;
        reservation.confirm(self.clock.now())?;

        if let Some(jetski_id) = reservation.jetski_id {
            self.ensure_jetski_usable(
                tenant_id,
                reservation.model_id,
                jetski_id,
                reservation.window(),
                Some(reservation.id),
            )
            .await?;
        }

        self.repos.reservations().update(reservation.clone()).await?;
        info!(reservation_id = %id, %tenant_id, "Reservation confirmed");
        Ok(reservation)
    }

    pub async fn cancel(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Reservation> {
        let (_guard, mut reservation) = self.load_locked(tenant_id, id).await?;
        reservation.cancel(self.clock.now())?;

        self.repos.reservations().update(reservation.clone()).await?;
        info!(reservation_id = %id, %tenant_id, "Reservation cancelled");
        Ok(reservation)
    }

    /// Close the reservation, typically on check-in. Already finalized records
    /// are returned unchanged.
    pub async fn finalize(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        rental_id: Option<Uuid>,
    ) -> DomainResult<Reservation> {
        let (_guard, mut reservation) = self.load_locked(tenant_id, id).await?;
        if reservation.status == ReservationStatus::Finalized {
            return Ok(reservation);
        }
        reservation.finalize(rental_id, self.clock.now());

        self.repos.reservations().update(reservation.clone()).await?;
        info!(
            reservation_id = %id,
            %tenant_id,
            rental_id = ?rental_id,
            "Reservation finalized"
        );
        Ok(reservation)
    }

    /// Record a deposit and promote the reservation to the guaranteed tier.
    pub async fn confirm_deposit(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        amount: Decimal,
    ) -> DomainResult<Reservation> {
        let (_guard, mut reservation) = self.load_locked(tenant_id, id).await?;
        let window = reservation.window();
        reservation.record_deposit(amount, self.clock.now())?;

        // The reservation is still stored as overbooked, so it is not part of
        // the guaranteed count.
        let snapshot =
            capacity::snapshot(self.repos.as_ref(), tenant_id, reservation.model_id, window)
                .await?;
        if !snapshot.can_accept_guaranteed() {
            metrics::capacity_rejected(PriorityTier::Guaranteed);
            return Err(DomainError::Business(format!(
                "capacity exhausted for guaranteed reservations in {window}: {}/{} units already guaranteed",
                snapshot.guaranteed_count, snapshot.total_units
            )));
        }

        self.repos.reservations().update(reservation.clone()).await?;
        metrics::deposit_confirmed();
        info!(
            reservation_id = %id,
            %tenant_id,
            amount = %amount,
            "Deposit confirmed, reservation guaranteed"
        );
        Ok(reservation)
    }

    pub async fn allocate_jetski(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        jetski_id: Uuid,
    ) -> DomainResult<Reservation> {
        let (_guard, mut reservation) = self.load_locked(tenant_id, id).await?;
        reservation.assign_jetski(jetski_id, self.clock.now())?;

        self.ensure_jetski_usable(
            tenant_id,
            reservation.model_id,
            jetski_id,
            reservation.window(),
            Some(reservation.id),
        )
        .await?;

        self.repos.reservations().update(reservation.clone()).await?;
        info!(
            reservation_id = %id,
            %tenant_id,
            %jetski_id,
            "Jetski allocated"
        );
        Ok(reservation)
    }

    pub async fn expire(&self, tenant_id: Uuid, id: Uuid) -> DomainResult<Reservation> {
        self.expire_at(tenant_id, id, self.clock.now()).await
    }

    /// Expire against an explicit instant. Used by the sweeper.
    pub async fn expire_at(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        now: chrono::DateTime<chrono::Utc>,
    ) -> DomainResult<Reservation> {
        let (_guard, mut reservation) = self.load_locked(tenant_id, id).await?;
        reservation.expire(now)?;

        self.repos.reservations().update(reservation.clone()).await?;
        metrics::reservation_expired();
        info!(
            reservation_id = %id,
            %tenant_id,
            expires_at = %reservation.expires_at,
            "Reservation expired"
        );
        Ok(reservation)
    }

    // ── Helpers ────────────────────────────────────────────────

    /// Tier admission against a snapshot that excludes the candidate itself.
    fn admits(
        &self,
        tier: PriorityTier,
        snapshot: &CapacitySnapshot,
        policy: &BookingPolicy,
    ) -> bool {
        match tier {
            PriorityTier::Guaranteed => snapshot.can_accept_guaranteed(),
            PriorityTier::Overbooked => {
                !self.settings.enforce_overbooking_cap_on_create
                    || snapshot.can_accept_overbooked(policy)
            }
        }
    }

    async fn load_model(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<JetskiModel> {
        self.repos
            .fleet()
            .get_model(tenant_id, model_id)
            .await?
            .ok_or_else(|| DomainError::not_found("JetskiModel", "id", model_id))
    }

    /// Lock the reservation's model and read the reservation again under the lock.
    async fn load_locked(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> DomainResult<(OwnedMutexGuard<()>, Reservation)> {
        let model_id = self.get(tenant_id, id).await?.model_id;
        let guard = self.locks.acquire(tenant_id, model_id).await;
        let reservation = self.get(tenant_id, id).await?;
        Ok((guard, reservation))
    }

    /// The jetski must belong to the model, be active and available, and be
    /// free for the window.
    async fn ensure_jetski_usable(
        &self,
        tenant_id: Uuid,
        model_id: Uuid,
        jetski_id: Uuid,
        window: TimeWindow,
        exclude: Option<Uuid>,
    ) -> DomainResult<()> {
        let jetski = self
            .repos
            .fleet()
            .get_jetski(tenant_id, jetski_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Jetski", "id", jetski_id))?;

        if jetski.model_id != model_id {
            return Err(DomainError::Business(format!(
                "jetski {} does not belong to model {model_id}",
                jetski.code
            )));
        }
        if !jetski.active {
            return Err(DomainError::Business(format!(
                "jetski {} is inactive",
                jetski.code
            )));
        }
        if jetski.status != JetskiStatus::Available {
            return Err(DomainError::Business(format!(
                "jetski {} is not available (status {})",
                jetski.code,
                jetski.status.as_str()
            )));
        }

        conflict::ensure_no_conflict(self.repos.as_ref(), tenant_id, jetski_id, window, exclude)
            .await?;
        debug!(%tenant_id, %jetski_id, %window, "Jetski usable for window");
        Ok(())
    }
}

fn capacity_exhausted(
    tier: PriorityTier,
    model: &JetskiModel,
    snapshot: &CapacitySnapshot,
    policy: &BookingPolicy,
    window: &TimeWindow,
) -> DomainError {
    match tier {
        PriorityTier::Guaranteed => DomainError::Business(format!(
            "capacity exhausted for guaranteed reservations of '{}' in {window}: {}/{} units already guaranteed",
            model.name,
            snapshot.used(tier),
            snapshot.limit(tier, policy)
        )),
        PriorityTier::Overbooked => DomainError::Business(format!(
            "overbooking limit reached for '{}' in {window}: {}/{} active reservations",
            model.name,
            snapshot.used(tier),
            snapshot.limit(tier, policy)
        )),
    }
}
