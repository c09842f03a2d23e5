//! Billable-time calculator
//!
//! Usage is charged in whole 15-minute blocks after a per-model tolerance is
//! subtracted. Partial blocks always round up. Money is `Decimal` end to end.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::DomainResult;
use crate::support::errors::DomainError;

/// Size of one billing block in minutes.
pub const BILLING_BLOCK_MINUTES: i64 = 15;

/// Whole minutes between check-in and check-out, truncated.
pub fn used_minutes(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> DomainResult<i64> {
    if check_out < check_in {
        return Err(DomainError::Validation(format!(
            "check-out {} is before check-in {}",
            check_out.to_rfc3339(),
            check_in.to_rfc3339()
        )));
    }
    Ok((check_out - check_in).num_minutes())
}

/// `ceil((used - tolerance) / 15) * 15`, or exactly 0 when usage is within tolerance.
pub fn billable_minutes(used_minutes: i64, tolerance_minutes: i64) -> DomainResult<i64> {
    if used_minutes < 0 {
        return Err(DomainError::Validation(format!(
            "used minutes must be non-negative, got {used_minutes}"
        )));
    }
    if tolerance_minutes < 0 {
        return Err(DomainError::Validation(format!(
            "tolerance minutes must be non-negative, got {tolerance_minutes}"
        )));
    }

    let excess = used_minutes - tolerance_minutes;
    if excess <= 0 {
        return Ok(0);
    }
    let blocks = (excess + BILLING_BLOCK_MINUTES - 1) / BILLING_BLOCK_MINUTES;
    Ok(blocks * BILLING_BLOCK_MINUTES)
}

/// `billable / 60 * hourly_price`, rounded half-up to 2 decimals.
pub fn base_value(billable_minutes: i64, hourly_price: Decimal) -> DomainResult<Decimal> {
    if billable_minutes < 0 {
        return Err(DomainError::Validation(format!(
            "billable minutes must be non-negative, got {billable_minutes}"
        )));
    }
    if hourly_price <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "hourly price must be positive, got {hourly_price}"
        )));
    }
    if billable_minutes == 0 {
        return Ok(Decimal::new(0, 2));
    }

    // Multiply before dividing so exact hour fractions stay exact.
    let mut value = (Decimal::from(billable_minutes) * hourly_price / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    Ok(value)
}

/// Checkout charge derived from a rental's check-in/check-out and the model profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageCharge {
    pub used_minutes: i64,
    pub tolerance_minutes: i64,
    pub billable_minutes: i64,
    pub hourly_price: Decimal,
    pub base_value: Decimal,
}

impl UsageCharge {
    pub fn compute(
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        tolerance_minutes: i64,
        hourly_price: Decimal,
    ) -> DomainResult<Self> {
        let used = used_minutes(check_in, check_out)?;
        let billable = billable_minutes(used, tolerance_minutes)?;
        let value = base_value(billable, hourly_price)?;
        Ok(Self {
            used_minutes: used,
            tolerance_minutes,
            billable_minutes: billable,
            hourly_price,
            base_value: value,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
