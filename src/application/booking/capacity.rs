//! Capacity oracle
//!
//! Aggregate counts for a (model, window) pair and the two-tier admission
//! rules built on them. The rules are pure functions of a snapshot plus the
//! tenant policy, so they can be exercised without storage.

use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    BookingPolicy, DomainResult, PriorityTier, RepositoryProvider, Reservation, TimeWindow,
};

/// Counts for one model over one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapacitySnapshot {
    /// Active jetskis of the model with status `Available`
    pub total_units: u32,
    /// Active guaranteed reservations overlapping the window
    pub guaranteed_count: u32,
    /// Active reservations of both tiers overlapping the window
    pub total_active_count: u32,
}

impl CapacitySnapshot {
    /// Build a snapshot from in-memory records.
    pub fn from_records(
        total_units: u32,
        reservations: &[Reservation],
        model_id: Uuid,
        window: &TimeWindow,
    ) -> Self {
        let mut snapshot = Self {
            total_units,
            ..Default::default()
        };
        for r in reservations
            .iter()
            .filter(|r| r.model_id == model_id && r.holds_capacity() && r.window().overlaps(window))
        {
            snapshot.total_active_count += 1;
            if r.priority == PriorityTier::Guaranteed {
                snapshot.guaranteed_count += 1;
            }
        }
        snapshot
    }

    pub fn can_accept_guaranteed(&self) -> bool {
        self.guaranteed_count < self.total_units
    }

    pub fn max_allowed(&self, policy: &BookingPolicy) -> u32 {
        policy.max_allowed(self.total_units)
    }

    pub fn can_accept_overbooked(&self, policy: &BookingPolicy) -> bool {
        self.total_active_count < self.max_allowed(policy)
    }

    /// Whether one more reservation of `tier` fits.
    pub fn can_accept(&self, tier: PriorityTier, policy: &BookingPolicy) -> bool {
        match tier {
            PriorityTier::Guaranteed => self.can_accept_guaranteed(),
            PriorityTier::Overbooked => self.can_accept_overbooked(policy),
        }
    }

    /// Drop one counted reservation of `tier`, for re-checking a record
    /// against a window it already overlaps.
    pub fn without(mut self, tier: PriorityTier) -> Self {
        self.total_active_count = self.total_active_count.saturating_sub(1);
        if tier == PriorityTier::Guaranteed {
            self.guaranteed_count = self.guaranteed_count.saturating_sub(1);
        }
        self
    }

    /// Reservations of `tier` already counted against that tier's limit.
    pub fn used(&self, tier: PriorityTier) -> u32 {
        match tier {
            PriorityTier::Guaranteed => self.guaranteed_count,
            PriorityTier::Overbooked => self.total_active_count,
        }
    }

    /// The limit `tier` is checked against.
    pub fn limit(&self, tier: PriorityTier, policy: &BookingPolicy) -> u32 {
        match tier {
            PriorityTier::Guaranteed => self.total_units,
            PriorityTier::Overbooked => self.max_allowed(policy),
        }
    }
}

/// Query the repositories for a snapshot.
pub async fn snapshot(
    repos: &dyn RepositoryProvider,
    tenant_id: Uuid,
    model_id: Uuid,
    window: TimeWindow,
) -> DomainResult<CapacitySnapshot> {
    let total_units = repos
        .fleet()
        .count_available_jetskis(tenant_id, model_id)
        .await?;
    let guaranteed_count = repos
        .reservations()
        .count_overlapping(tenant_id, model_id, window, Some(PriorityTier::Guaranteed))
        .await?;
    let total_active_count = repos
        .reservations()
        .count_overlapping(tenant_id, model_id, window, None)
        .await?;

    let snapshot = CapacitySnapshot {
        total_units,
        guaranteed_count,
        total_active_count,
    };
    debug!(
        %tenant_id,
        %model_id,
        %window,
        total_units,
        guaranteed_count,
        total_active_count,
        "Capacity snapshot"
    );
    Ok(snapshot)
}
