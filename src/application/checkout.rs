//! Checkout pricing
//!
//! Turns a check-in/check-out pair on a physical jetski into a charge using
//! the model's hourly price and tolerance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::domain::{BookingPolicy, DomainError, DomainResult, RepositoryProvider, UsageCharge};

pub struct CheckoutService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CheckoutService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn quote(
        &self,
        tenant_id: Uuid,
        jetski_id: Uuid,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> DomainResult<UsageCharge> {
        let jetski = self
            .repos
            .fleet()
            .get_jetski(tenant_id, jetski_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Jetski", "id", jetski_id))?;
        let model = self
            .repos
            .fleet()
            .get_model(tenant_id, jetski.model_id)
            .await?
            .ok_or_else(|| DomainError::not_found("JetskiModel", "id", jetski.model_id))?;

        let charge = UsageCharge::compute(
            check_in,
            check_out,
            model.tolerance_minutes,
            model.hourly_price,
        )?;

        info!(
            %tenant_id,
            jetski = %jetski.code,
            used_minutes = charge.used_minutes,
            billable_minutes = charge.billable_minutes,
            base_value = %charge.base_value,
            "Usage quoted"
        );
        Ok(charge)
    }
}

/// Informational deposit for an expected price under `policy`.
pub fn suggested_deposit(policy: &BookingPolicy, expected_price: Decimal) -> Decimal {
    policy.suggested_deposit(expected_price)
}
