//! Conflict detector
//!
//! Exact overlap checks for one physical jetski. Model-level admission goes
//! through the capacity oracle instead.

use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Reservation, TimeWindow};

/// Active reservations on `jetski_id` overlapping `window`, skipping `exclude`.
pub fn overlapping_on_jetski<'a>(
    reservations: &'a [Reservation],
    jetski_id: Uuid,
    window: &'a TimeWindow,
    exclude: Option<Uuid>,
) -> impl Iterator<Item = &'a Reservation> + 'a {
    reservations.iter().filter(move |r| {
        r.jetski_id == Some(jetski_id)
            && Some(r.id) != exclude
            && r.holds_capacity()
            && r.window().overlaps(window)
    })
}

pub async fn find_conflicts(
    repos: &dyn RepositoryProvider,
    tenant_id: Uuid,
    jetski_id: Uuid,
    window: TimeWindow,
    exclude: Option<Uuid>,
) -> DomainResult<Vec<Reservation>> {
    repos
        .reservations()
        .find_jetski_conflicts(tenant_id, jetski_id, window, exclude)
        .await
}

/// Fails with a business error naming the first conflicting reservation.
pub async fn ensure_no_conflict(
    repos: &dyn RepositoryProvider,
    tenant_id: Uuid,
    jetski_id: Uuid,
    window: TimeWindow,
    exclude: Option<Uuid>,
) -> DomainResult<()> {
    let conflicts = find_conflicts(repos, tenant_id, jetski_id, window, exclude).await?;
    match conflicts.first() {
        None => Ok(()),
        Some(existing) => Err(schedule_conflict(jetski_id, &window, existing)),
    }
}

pub fn schedule_conflict(jetski_id: Uuid, requested: &TimeWindow, existing: &Reservation) -> DomainError {
    DomainError::Business(format!(
        "jetski {jetski_id} is already reserved by {} for {} (requested {requested})",
        existing.id,
        existing.window()
    ))
}
