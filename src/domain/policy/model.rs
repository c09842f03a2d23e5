//! Booking policy entity

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::DomainResult;
use crate::support::errors::DomainError;

pub const DEFAULT_GRACE_PERIOD_MINUTES: i64 = 30;
pub const DEFAULT_MAX_WITHOUT_DEPOSIT: u32 = 8;
pub const DEFAULT_NOTIFICATION_LEAD_MINUTES: i64 = 60;

/// Booking constants for one tenant. One row per tenant, no history.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingPolicy {
    pub tenant_id: Uuid,
    /// Minutes after start before an unpaid reservation may expire
    pub grace_period_minutes: i64,
    /// Suggested deposit as a percentage of the expected price (informational)
    pub deposit_percentage: Decimal,
    /// Soft cap multiplier over physical units for all active reservations
    pub overbooking_factor: Decimal,
    /// Stored for operators; not enforced by the engine
    pub max_without_deposit: u32,
    pub notification_lead_minutes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingPolicy {
    /// Default policy, created on first read for a tenant.
    pub fn defaults_for(tenant_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            tenant_id,
            grace_period_minutes: DEFAULT_GRACE_PERIOD_MINUTES,
            deposit_percentage: Decimal::new(30, 0),
            overbooking_factor: Decimal::new(15, 1),
            max_without_deposit: DEFAULT_MAX_WITHOUT_DEPOSIT,
            notification_lead_minutes: DEFAULT_NOTIFICATION_LEAD_MINUTES,
            created_at: now,
            updated_at: now,
        }
    }

    /// `floor(total_units × overbooking_factor)`
    pub fn max_allowed(&self, total_units: u32) -> u32 {
        (Decimal::from(total_units) * self.overbooking_factor)
            .floor()
            .to_u32()
            .unwrap_or(u32::MAX)
    }

    /// Suggested deposit for an expected price, rounded half-up to cents.
    pub fn suggested_deposit(&self, expected_price: Decimal) -> Decimal {
        let mut deposit = (expected_price * self.deposit_percentage / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        deposit.rescale(2);
        deposit
    }
}

/// Administrator update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PolicyUpdate {
    #[validate(range(min = 0, max = 1440, message = "grace period must be 0..=1440 minutes"))]
    pub grace_period_minutes: Option<i64>,
    pub deposit_percentage: Option<Decimal>,
    pub overbooking_factor: Option<Decimal>,
    #[validate(range(max = 1000, message = "max without deposit must be at most 1000"))]
    pub max_without_deposit: Option<u32>,
    #[validate(range(min = 0, max = 10080, message = "notification lead must be 0..=10080 minutes"))]
    pub notification_lead_minutes: Option<i64>,
}

impl PolicyUpdate {
    /// Validate and apply onto `policy`.
    pub fn apply(&self, policy: &mut BookingPolicy) -> DomainResult<()> {
        self.validate()?;

        if let Some(pct) = self.deposit_percentage {
            if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                return Err(DomainError::Validation(format!(
                    "deposit percentage must be within 0..=100, got {pct}"
                )));
            }
        }
        if let Some(factor) = self.overbooking_factor {
            if factor < Decimal::ONE {
                return Err(DomainError::Validation(format!(
                    "overbooking factor must be at least 1.0, got {factor}"
                )));
            }
        }

        if let Some(v) = self.grace_period_minutes {
            policy.grace_period_minutes = v;
        }
        if let Some(v) = self.deposit_percentage {
            policy.deposit_percentage = v;
        }
        if let Some(v) = self.overbooking_factor {
            policy.overbooking_factor = v;
        }
        if let Some(v) = self.max_without_deposit {
            policy.max_without_deposit = v;
        }
        if let Some(v) = self.notification_lead_minutes {
            policy.notification_lead_minutes = v;
        }
        policy.updated_at = Utc::now();
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
