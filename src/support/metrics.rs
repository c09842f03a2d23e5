//! Metric names for the booking engine.
//!
//! Recorded with the `metrics` facade; exported by the Prometheus recorder
//! installed in `server::ServerHandle::start`.

use crate::domain::reservation::PriorityTier;

/// Counter: reservations created. Labels: tier.
pub const RESERVATIONS_CREATED_TOTAL: &str = "booking_reservations_created_total";

/// Counter: requests rejected for lack of capacity. Labels: tier.
pub const CAPACITY_REJECTIONS_TOTAL: &str = "booking_capacity_rejections_total";

/// Counter: reservations expired by the sweeper or by explicit calls.
pub const RESERVATIONS_EXPIRED_TOTAL: &str = "booking_reservations_expired_total";

/// Counter: deposits confirmed (Overbooked → Guaranteed upgrades).
pub const DEPOSITS_CONFIRMED_TOTAL: &str = "booking_deposits_confirmed_total";

/// Histogram: expiration sweep duration in seconds.
pub const SWEEP_DURATION_SECONDS: &str = "booking_sweep_duration_seconds";

pub fn reservation_created(tier: PriorityTier) {
    metrics::counter!(RESERVATIONS_CREATED_TOTAL, "tier" => tier.as_str()).increment(1);
}

pub fn capacity_rejected(tier: PriorityTier) {
    metrics::counter!(CAPACITY_REJECTIONS_TOTAL, "tier" => tier.as_str()).increment(1);
}

pub fn reservation_expired() {
    metrics::counter!(RESERVATIONS_EXPIRED_TOTAL).increment(1);
}

pub fn deposit_confirmed() {
    metrics::counter!(DEPOSITS_CONFIRMED_TOTAL).increment(1);
}

pub fn sweep_finished(elapsed: std::time::Duration) {
    metrics::histogram!(SWEEP_DURATION_SECONDS).record(elapsed.as_secs_f64());
}
