//! Lifecycle scenarios against the in-memory repositories

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;
use crate::domain::{
    Customer, DomainError, Jetski, JetskiModel, JetskiStatus, NewReservation, PolicyUpdate,
    PriorityTier, Reservation, ReservationPatch, ReservationStatus, TimeWindow,
};
use crate::infrastructure::storage::InMemoryRepositoryProvider;
use crate::support::time::ManualClock;

struct Fixture {
    storage: Arc<InMemoryRepositoryProvider>,
    clock: Arc<ManualClock>,
    service: Arc<ReservationService>,
    tenant: Uuid,
    model: Uuid,
    customer: Uuid,
    jetskis: Vec<Uuid>,
    t0: DateTime<Utc>,
}

fn fixture(units: usize) -> Fixture {
    fixture_with(units, BookingSettings::default())
}

fn fixture_with(units: usize, settings: BookingSettings) -> Fixture {
    let storage = Arc::new(InMemoryRepositoryProvider::new());
    let t0 = Utc::now();
    let clock = Arc::new(ManualClock::new(t0));
    let tenant = Uuid::new_v4();

    let model = storage.add_model(JetskiModel::new(tenant, "Sea-Doo Spark", dec!(150.00), 5));
    let jetskis = (0..units)
        .map(|i| storage.add_jetski(Jetski::new(tenant, model, format!("SP-{i:02}"))))
        .collect();
    let customer = storage.add_customer(Customer::new(tenant, "Marina Costa"));

    let service = Arc::new(ReservationService::new(
        storage.clone(),
        clock.clone(),
        settings,
    ));

    Fixture {
        storage,
        clock,
        service,
        tenant,
        model,
        customer,
        jetskis,
        t0,
    }
}

impl Fixture {
    /// Request for `[t0 + start_h, t0 + start_h + len_h)`.
    fn request(&self, start_h: i64, len_h: i64) -> NewReservation {
        let start = self.t0 + Duration::hours(start_h);
        NewReservation::new(
            self.tenant,
            self.model,
            self.customer,
            start,
            start + Duration::hours(len_h),
        )
    }

    fn window(&self, start_h: i64, len_h: i64) -> TimeWindow {
        let start = self.t0 + Duration::hours(start_h);
        TimeWindow::new(start, start + Duration::hours(len_h)).unwrap()
    }

    async fn guaranteed(&self, start_h: i64, len_h: i64) -> Result<Reservation, DomainError> {
        self.service
            .create(self.request(start_h, len_h).with_deposit(dec!(45.00)))
            .await
    }

    async fn overbooked(&self, start_h: i64, len_h: i64) -> Result<Reservation, DomainError> {
        self.service.create(self.request(start_h, len_h)).await
    }
}

fn assert_business(result: Result<Reservation, DomainError>, needle: &str) {
    match result {
        Err(DomainError::Business(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} should mention {needle:?}")
        }
        other => panic!("expected business error mentioning {needle:?}, got {other:?}"),
    }
}

// ── Admission ──────────────────────────────────────────────────

#[tokio::test]
async fn two_tier_capacity_scenario() {
    let f = fixture(2);

    let g1 = f.guaranteed(1, 2).await.unwrap();
    let g2 = f.guaranteed(1, 2).await.unwrap();
    assert_eq!(g1.priority, PriorityTier::Guaranteed);
    assert_eq!(g2.status, ReservationStatus::Pending);

    assert_business(f.guaranteed(1, 2).await, "capacity exhausted");

    let o1 = f.overbooked(1, 2).await.unwrap();
    assert_eq!(o1.priority, PriorityTier::Overbooked);

    assert_business(f.overbooked(1, 2).await, "overbooking limit");

    let window = f.window(1, 2);
    assert!(!f
        .service
        .check_model_availability(f.tenant, f.model, window, true)
        .await
        .unwrap());
    assert!(!f
        .service
        .check_model_availability(f.tenant, f.model, window, false)
        .await
        .unwrap());
    // A later, disjoint window is untouched.
    assert!(f
        .service
        .check_model_availability(f.tenant, f.model, f.window(3, 1), true)
        .await
        .unwrap());
}

#[tokio::test]
async fn deferred_overbooking_cap_admits_past_limit() {
    let f = fixture_with(
        2,
        BookingSettings {
            enforce_overbooking_cap_on_create: false,
        },
    );
    for _ in 0..5 {
        f.overbooked(1, 2).await.unwrap();
    }
    assert!(!f
        .service
        .check_model_availability(f.tenant, f.model, f.window(1, 2), false)
        .await
        .unwrap());
}

#[tokio::test]
async fn overbooking_factor_comes_from_tenant_policy() {
    let f = fixture(2);
    f.service
        .policies()
        .update_policy(
            f.tenant,
            PolicyUpdate {
                overbooking_factor: Some(dec!(2.0)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    for _ in 0..4 {
        f.overbooked(1, 2).await.unwrap();
    }
    assert_business(f.overbooked(1, 2).await, "overbooking limit");
}

#[tokio::test]
async fn zero_deposit_is_overbooked() {
    let f = fixture(1);
    let r = f
        .service
        .create(f.request(1, 1).with_deposit(Decimal::ZERO))
        .await
        .unwrap();
    assert_eq!(r.priority, PriorityTier::Overbooked);
    assert!(!r.deposit_paid);
    assert!(r.deposit_paid_at.is_none());
}

#[tokio::test]
async fn deposit_paid_at_is_stamped_on_create() {
    let f = fixture(1);
    let r = f.guaranteed(1, 1).await.unwrap();
    assert_eq!(r.deposit_paid_at, Some(f.t0));
    assert_eq!(r.deposit_amount, dec!(45.00));
}

#[tokio::test]
async fn model_without_available_units_rejects() {
    let f = fixture(1);
    f.storage
        .set_jetski_status(f.jetskis[0], JetskiStatus::Maintenance)
        .unwrap();
    assert_business(f.overbooked(1, 1).await, "no units available");
}

#[tokio::test]
async fn invalid_requests_are_validation_errors() {
    let f = fixture(1);

    let past = f.request(-2, 1);
    assert!(matches!(
        f.service.create(past).await,
        Err(DomainError::Validation(_))
    ));

    let mut inverted = f.request(2, 1);
    inverted.end = inverted.start - Duration::minutes(1);
    assert!(matches!(
        f.service.create(inverted).await,
        Err(DomainError::Validation(_))
    ));

    let negative = f.request(1, 1).with_deposit(dec!(-10));
    assert!(matches!(
        f.service.create(negative).await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn unknown_model_and_inactive_customer() {
    let f = fixture(1);

    let mut req = f.request(1, 1);
    req.model_id = Uuid::new_v4();
    assert!(matches!(
        f.service.create(req).await,
        Err(DomainError::NotFound { entity: "JetskiModel", .. })
    ));

    let mut dormant = Customer::new(f.tenant, "Inactive Person");
    dormant.active = false;
    let dormant = f.storage.add_customer(dormant);
    let mut req = f.request(1, 1);
    req.customer_id = dormant;
    assert_business(f.service.create(req).await, "inactive");
}

#[tokio::test]
async fn concurrent_guaranteed_requests_never_exceed_units() {
    let f = fixture(2);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = f.service.clone();
        let req = f.request(1, 2).with_deposit(dec!(30));
        handles.push(tokio::spawn(async move { service.create(req).await }));
    }

    let mut admitted = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 2);
}

// ── Jetski binding ─────────────────────────────────────────────

#[tokio::test]
async fn allocating_busy_jetski_names_holder() {
    let f = fixture(2);
    let first = f.overbooked(1, 2).await.unwrap();
    let second = f.overbooked(2, 2).await.unwrap();

    f.service
        .allocate_jetski(f.tenant, first.id, f.jetskis[0])
        .await
        .unwrap();

    let err = f
        .service
        .allocate_jetski(f.tenant, second.id, f.jetskis[0])
        .await;
    assert_business(err, &first.id.to_string());

    let bound = f
        .service
        .allocate_jetski(f.tenant, second.id, f.jetskis[1])
        .await
        .unwrap();
    assert_eq!(bound.jetski_id, Some(f.jetskis[1]));

    assert_business(
        f.service
            .allocate_jetski(f.tenant, second.id, f.jetskis[0])
            .await,
        "already has jetski",
    );
}

#[tokio::test]
async fn allocation_requires_available_jetski_of_same_model() {
    let f = fixture(2);
    let r = f.overbooked(1, 1).await.unwrap();

    f.storage
        .set_jetski_status(f.jetskis[0], JetskiStatus::Rented)
        .unwrap();
    assert_business(
        f.service.allocate_jetski(f.tenant, r.id, f.jetskis[0]).await,
        "not available",
    );

    let other_model = f
        .storage
        .add_model(JetskiModel::new(f.tenant, "Kawasaki Ultra", dec!(220), 10));
    let foreign = f
        .storage
        .add_jetski(Jetski::new(f.tenant, other_model, "KU-01"));
    assert_business(
        f.service.allocate_jetski(f.tenant, r.id, foreign).await,
        "does not belong",
    );

    assert!(matches!(
        f.service
            .allocate_jetski(f.tenant, r.id, Uuid::new_v4())
            .await,
        Err(DomainError::NotFound { entity: "Jetski", .. })
    ));
}

#[tokio::test]
async fn create_with_named_jetski_checks_conflicts() {
    let f = fixture(2);
    let first = f
        .service
        .create(f.request(1, 2).with_jetski(f.jetskis[0]))
        .await
        .unwrap();
    assert_eq!(first.jetski_id, Some(f.jetskis[0]));

    assert_business(
        f.service
            .create(f.request(2, 2).with_jetski(f.jetskis[0]))
            .await,
        &first.id.to_string(),
    );

    // Back-to-back is fine.
    f.service
        .create(f.request(3, 1).with_jetski(f.jetskis[0]))
        .await
        .unwrap();
}

#[tokio::test]
async fn confirm_revalidates_bound_jetski() {
    let f = fixture(1);
    let r = f
        .service
        .create(f.request(1, 1).with_jetski(f.jetskis[0]))
        .await
        .unwrap();

    f.storage
        .set_jetski_status(f.jetskis[0], JetskiStatus::Maintenance)
        .unwrap();
    assert_business(f.service.confirm(f.tenant, r.id).await, "not available");
    assert_eq!(
        f.service.get(f.tenant, r.id).await.unwrap().status,
        ReservationStatus::Pending
    );

    f.storage
        .set_jetski_status(f.jetskis[0], JetskiStatus::Available)
        .unwrap();
    let confirmed = f.service.confirm(f.tenant, r.id).await.unwrap();
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);

    assert_business(f.service.confirm(f.tenant, r.id).await, "cannot confirm");
}

// ── Updates ────────────────────────────────────────────────────

#[tokio::test]
async fn moving_window_onto_busy_jetski_fails() {
    let f = fixture(1);
    let early = f
        .service
        .create(f.request(1, 1).with_jetski(f.jetskis[0]))
        .await
        .unwrap();
    let late = f
        .service
        .create(f.request(3, 1).with_jetski(f.jetskis[0]))
        .await
        .unwrap();

    let onto_early = ReservationPatch {
        start: Some(early.start + Duration::minutes(30)),
        end: Some(late.end),
        ..Default::default()
    };
    assert_business(
        f.service.update(f.tenant, late.id, onto_early).await,
        &early.id.to_string(),
    );

    // Moving within its own slot excludes itself.
    let shift = ReservationPatch {
        start: Some(late.start + Duration::minutes(15)),
        ..Default::default()
    };
    let moved = f.service.update(f.tenant, late.id, shift).await.unwrap();
    assert_eq!(moved.start, late.start + Duration::minutes(15));
    assert_eq!(moved.expires_at, late.expires_at);
}

#[tokio::test]
async fn closed_reservations_cannot_be_updated() {
    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();
    f.service.cancel(f.tenant, r.id).await.unwrap();

    let patch = ReservationPatch {
        notes: Some("customer called back".into()),
        ..Default::default()
    };
    assert_business(f.service.update(f.tenant, r.id, patch).await, "cannot update");
}

#[tokio::test]
async fn notes_update_on_confirmed() {
    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();
    f.service.confirm(f.tenant, r.id).await.unwrap();

    let patch = ReservationPatch {
        notes: Some("two life vests".into()),
        ..Default::default()
    };
    let updated = f.service.update(f.tenant, r.id, patch).await.unwrap();
    assert_eq!(updated.notes.as_deref(), Some("two life vests"));
    assert_eq!(updated.status, ReservationStatus::Confirmed);
}

#[tokio::test]
async fn moving_guaranteed_into_full_window_fails() {
    let f = fixture(1);
    f.guaranteed(1, 2).await.unwrap();
    let later = f.guaranteed(5, 2).await.unwrap();

    let onto_first = ReservationPatch {
        start: Some(f.t0 + Duration::hours(1)),
        end: Some(f.t0 + Duration::hours(3)),
        ..Default::default()
    };
    assert_business(
        f.service.update(f.tenant, later.id, onto_first).await,
        "capacity exhausted",
    );
    let stored = f.service.get(f.tenant, later.id).await.unwrap();
    assert_eq!(stored.start, later.start);

    let guaranteed = f
        .service
        .list_for_model(f.tenant, f.model)
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.priority == PriorityTier::Guaranteed && r.window().overlaps(&f.window(1, 2)))
        .count();
    assert_eq!(guaranteed, 1);

    // Stretching inside its own slot only counts itself once.
    let stretch = ReservationPatch {
        end: Some(later.end + Duration::hours(1)),
        ..Default::default()
    };
    let stretched = f.service.update(f.tenant, later.id, stretch).await.unwrap();
    assert_eq!(stretched.end, later.end + Duration::hours(1));
}

#[tokio::test]
async fn moving_overbooked_past_cap_fails() {
    let f = fixture(2);
    for _ in 0..3 {
        f.overbooked(1, 2).await.unwrap();
    }
    assert_business(f.overbooked(1, 2).await, "overbooking limit");
    let outside = f.overbooked(6, 2).await.unwrap();

    let into_full = ReservationPatch {
        start: Some(f.t0 + Duration::hours(1)),
        end: Some(f.t0 + Duration::hours(3)),
        ..Default::default()
    };
    assert_business(
        f.service.update(f.tenant, outside.id, into_full).await,
        "overbooking limit",
    );
    assert!(!f
        .service
        .check_model_availability(f.tenant, f.model, f.window(1, 2), false)
        .await
        .unwrap());
}

#[tokio::test]
async fn deferred_cap_lets_overbooked_move_into_full_window() {
    let f = fixture_with(
        2,
        BookingSettings {
            enforce_overbooking_cap_on_create: false,
        },
    );
    for _ in 0..3 {
        f.overbooked(1, 2).await.unwrap();
    }
    let outside = f.overbooked(6, 2).await.unwrap();

    let into_full = ReservationPatch {
        start: Some(f.t0 + Duration::hours(1)),
        end: Some(f.t0 + Duration::hours(3)),
        ..Default::default()
    };
    let moved = f
        .service
        .update(f.tenant, outside.id, into_full)
        .await
        .unwrap();
    assert_eq!(moved.start, f.t0 + Duration::hours(1));
}

#[tokio::test]
async fn update_rejects_start_in_the_past() {
    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();

    let backdated = ReservationPatch {
        start: Some(f.t0 - Duration::hours(1)),
        ..Default::default()
    };
    assert!(matches!(
        f.service.update(f.tenant, r.id, backdated).await,
        Err(DomainError::Validation(_))
    ));
    assert_eq!(f.service.get(f.tenant, r.id).await.unwrap().start, r.start);
}

// ── Deposit upgrade ────────────────────────────────────────────

#[tokio::test]
async fn deposit_upgrade_respects_guaranteed_capacity() {
    let f = fixture_with(
        1,
        BookingSettings {
            enforce_overbooking_cap_on_create: false,
        },
    );
    let waiting = f.overbooked(1, 2).await.unwrap();
    let other = f.overbooked(1, 2).await.unwrap();

    let upgraded = f
        .service
        .confirm_deposit(f.tenant, waiting.id, dec!(60.00))
        .await
        .unwrap();
    assert_eq!(upgraded.priority, PriorityTier::Guaranteed);
    assert!(upgraded.deposit_paid);
    assert_eq!(upgraded.deposit_paid_at, Some(f.t0));

    assert_business(
        f.service.confirm_deposit(f.tenant, other.id, dec!(60.00)).await,
        "capacity exhausted",
    );
    let untouched = f.service.get(f.tenant, other.id).await.unwrap();
    assert_eq!(untouched.priority, PriorityTier::Overbooked);
    assert!(!untouched.deposit_paid);
}

#[tokio::test]
async fn deposit_twice_fails_and_keeps_state() {
    let f = fixture(2);
    let r = f.overbooked(1, 1).await.unwrap();
    let first = f
        .service
        .confirm_deposit(f.tenant, r.id, dec!(40))
        .await
        .unwrap();

    f.clock.advance(Duration::minutes(5));
    assert_business(
        f.service.confirm_deposit(f.tenant, r.id, dec!(99)).await,
        "already paid",
    );
    assert_eq!(f.service.get(f.tenant, r.id).await.unwrap(), first);
}

#[tokio::test]
async fn deposit_amount_must_be_positive() {
    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();
    assert!(matches!(
        f.service.confirm_deposit(f.tenant, r.id, Decimal::ZERO).await,
        Err(DomainError::Validation(_))
    ));
}

// ── Expiry ─────────────────────────────────────────────────────

#[tokio::test]
async fn expiry_follows_grace_period() {
    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();
    assert_eq!(r.expires_at, f.t0 + Duration::minutes(90));

    let early = f
        .service
        .expire_at(f.tenant, r.id, f.t0 + Duration::minutes(75))
        .await;
    assert_business(early, "grace period");

    let expired = f
        .service
        .expire_at(f.tenant, r.id, f.t0 + Duration::minutes(91))
        .await
        .unwrap();
    assert_eq!(expired.status, ReservationStatus::Expired);
    assert!(!expired.active);
}

#[tokio::test]
async fn expire_uses_service_clock() {
    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();

    assert!(f.service.expire(f.tenant, r.id).await.is_err());
    f.clock.set(r.expires_at + Duration::seconds(1));
    f.service.expire(f.tenant, r.id).await.unwrap();
}

#[tokio::test]
async fn deposit_paid_never_expires() {
    let f = fixture(1);
    let r = f.guaranteed(1, 1).await.unwrap();
    assert_business(
        f.service
            .expire_at(f.tenant, r.id, f.t0 + Duration::days(2))
            .await,
        "never expires",
    );
}

#[tokio::test]
async fn expired_reservation_frees_capacity() {
    let f = fixture(2);
    let r = f.overbooked(1, 2).await.unwrap();
    f.overbooked(1, 2).await.unwrap();
    f.overbooked(1, 2).await.unwrap();
    assert_business(f.overbooked(1, 2).await, "overbooking limit");

    f.service
        .expire_at(f.tenant, r.id, r.expires_at + Duration::minutes(1))
        .await
        .unwrap();
    f.overbooked(1, 2).await.unwrap();
}

#[tokio::test]
async fn sweeper_expires_only_overdue_unpaid() {
    let f = fixture(3);
    let due_a = f.overbooked(1, 1).await.unwrap();
    let due_b = f.overbooked(1, 1).await.unwrap();
    let paid = f.guaranteed(1, 1).await.unwrap();
    let later = f.overbooked(5, 1).await.unwrap();

    let sweeper = ExpirationSweeper::new(f.storage.clone(), f.service.clone());
    let now = f.t0 + Duration::hours(2);

    assert_eq!(sweeper.process_expirations(now).await.unwrap(), 2);
    assert_eq!(sweeper.process_expirations(now).await.unwrap(), 0);

    let status = |id| {
        let service = f.service.clone();
        let tenant = f.tenant;
        async move { service.get(tenant, id).await.unwrap().status }
    };
    assert_eq!(status(due_a.id).await, ReservationStatus::Expired);
    assert_eq!(status(due_b.id).await, ReservationStatus::Expired);
    assert_eq!(status(paid.id).await, ReservationStatus::Pending);
    assert_eq!(status(later.id).await, ReservationStatus::Pending);
}

#[test]
fn empty_sweep_still_records_duration() {
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let f = fixture(1);
    let sweeper = ExpirationSweeper::new(f.storage.clone(), f.service.clone());
    let expired = ::metrics::with_local_recorder(&recorder, || {
        rt.block_on(sweeper.process_expirations(f.t0))
    })
    .unwrap();

    assert_eq!(expired, 0);
    assert!(handle
        .render()
        .contains("booking_sweep_duration_seconds_count 1"));
}

#[tokio::test]
async fn sweeper_task_stops_on_shutdown() {
    use crate::support::shutdown::ShutdownSignal;

    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();
    f.clock.set(r.expires_at + Duration::minutes(1));

    let sweeper = Arc::new(ExpirationSweeper::new(f.storage.clone(), f.service.clone()));
    let shutdown = ShutdownSignal::new();
    let handle = start_expiration_task(sweeper, f.clock.clone(), shutdown.clone(), 1);

    // The first interval tick fires immediately.
    let mut expired = false;
    for _ in 0..50 {
        if f.service.get(f.tenant, r.id).await.unwrap().status == ReservationStatus::Expired {
            expired = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(expired);

    shutdown.trigger();
    tokio::time::timeout(std::time::Duration::from_secs(2), handle)
        .await
        .expect("sweeper stops")
        .unwrap();
}

// ── Closing ────────────────────────────────────────────────────

#[tokio::test]
async fn cancel_then_finalize() {
    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();

    let cancelled = f.service.cancel(f.tenant, r.id).await.unwrap();
    assert!(!cancelled.active);
    assert_business(f.service.cancel(f.tenant, r.id).await, "cannot cancel");

    let rental = Uuid::new_v4();
    let finalized = f
        .service
        .finalize(f.tenant, r.id, Some(rental))
        .await
        .unwrap();
    assert_eq!(finalized.status, ReservationStatus::Finalized);
    assert_eq!(finalized.rental_id, Some(rental));

    let again = f.service.finalize(f.tenant, r.id, None).await.unwrap();
    assert_eq!(again, finalized);
}

#[tokio::test]
async fn other_tenant_sees_not_found() {
    let f = fixture(1);
    let r = f.overbooked(1, 1).await.unwrap();
    let stranger = Uuid::new_v4();

    assert!(matches!(
        f.service.get(stranger, r.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        f.service.cancel(stranger, r.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(f
        .service
        .list_for_model(stranger, f.model)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(f.service.list_for_model(f.tenant, f.model).await.unwrap().len(), 1);
}

// ── Properties ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Create {
        start_h: i64,
        len_h: i64,
        deposit: bool,
        jetski: Option<usize>,
    },
    Allocate {
        reservation: usize,
        jetski: usize,
    },
    Confirm {
        reservation: usize,
    },
    Cancel {
        reservation: usize,
    },
    Update {
        reservation: usize,
        start_h: i64,
        len_h: i64,
    },
    Deposit {
        reservation: usize,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..8, 1i64..4, any::<bool>(), proptest::option::of(0usize..3)).prop_map(
            |(start_h, len_h, deposit, jetski)| Op::Create {
                start_h,
                len_h,
                deposit,
                jetski,
            }
        ),
        (0usize..16, 0usize..3).prop_map(|(reservation, jetski)| Op::Allocate {
            reservation,
            jetski,
        }),
        (0usize..16).prop_map(|reservation| Op::Confirm { reservation }),
        (0usize..16).prop_map(|reservation| Op::Cancel { reservation }),
        (0usize..16, 1i64..8, 1i64..4).prop_map(|(reservation, start_h, len_h)| Op::Update {
            reservation,
            start_h,
            len_h,
        }),
        (0usize..16).prop_map(|reservation| Op::Deposit { reservation }),
    ]
}

async fn run_ops(ops: Vec<Op>) -> (Fixture, Vec<Reservation>) {
    let f = fixture(3);
    let mut created: Vec<Uuid> = Vec::new();

    for op in ops {
        match op {
            Op::Create {
                start_h,
                len_h,
                deposit,
                jetski,
            } => {
                let mut req = f.request(start_h, len_h);
                if deposit {
                    req = req.with_deposit(dec!(25));
                }
                if let Some(i) = jetski {
                    req = req.with_jetski(f.jetskis[i]);
                }
                if let Ok(r) = f.service.create(req).await {
                    created.push(r.id);
                }
            }
            Op::Allocate {
                reservation,
                jetski,
            } => {
                if let Some(id) = created.get(reservation) {
                    let _ = f
                        .service
                        .allocate_jetski(f.tenant, *id, f.jetskis[jetski])
                        .await;
                }
            }
            Op::Confirm { reservation } => {
                if let Some(id) = created.get(reservation) {
                    let _ = f.service.confirm(f.tenant, *id).await;
                }
            }
            Op::Cancel { reservation } => {
                if let Some(id) = created.get(reservation) {
                    let _ = f.service.cancel(f.tenant, *id).await;
                }
            }
            Op::Update {
                reservation,
                start_h,
                len_h,
            } => {
                if let Some(id) = created.get(reservation) {
                    let window = f.window(start_h, len_h);
                    let patch = ReservationPatch {
                        start: Some(window.start),
                        end: Some(window.end),
                        ..Default::default()
                    };
                    let _ = f.service.update(f.tenant, *id, patch).await;
                }
            }
            Op::Deposit { reservation } => {
                if let Some(id) = created.get(reservation) {
                    let _ = f.service.confirm_deposit(f.tenant, *id, dec!(25)).await;
                }
            }
        }
    }

    let all = f.service.list_for_model(f.tenant, f.model).await.unwrap();
    (f, all)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn no_double_booking_and_guaranteed_within_units(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (f, all) = rt.block_on(run_ops(ops));
        let live: Vec<&Reservation> = all.iter().filter(|r| r.holds_capacity()).collect();

        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                if a.jetski_id.is_some() && a.jetski_id == b.jetski_id {
                    prop_assert!(
                        !a.window().overlaps(&b.window()),
                        "{} and {} share a jetski", a.id, b.id
                    );
                }
            }
        }

        for r in &live {
            let guaranteed_at_start = live
                .iter()
                .filter(|o| o.priority == PriorityTier::Guaranteed && o.window().contains_instant(r.start))
                .count();
            prop_assert!(guaranteed_at_start <= f.jetskis.len());
        }
    }
}
