//! Booking policy service

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{BookingPolicy, DomainResult, PolicyUpdate, RepositoryProvider};

/// Reads and maintains the per-tenant booking policy.
#[derive(Clone)]
pub struct BookingPolicyService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingPolicyService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Tenant policy. A tenant without one gets the defaults persisted on first read.
    pub async fn get_policy(&self, tenant_id: Uuid) -> DomainResult<BookingPolicy> {
        if let Some(policy) = self.repos.policies().find(tenant_id).await? {
            return Ok(policy);
        }

        let policy = BookingPolicy::defaults_for(tenant_id);
        self.repos.policies().save(policy.clone()).await?;
        info!(%tenant_id, "Created default booking policy");
        Ok(policy)
    }

    pub async fn update_policy(
        &self,
        tenant_id: Uuid,
        update: PolicyUpdate,
    ) -> DomainResult<BookingPolicy> {
        let mut policy = self.get_policy(tenant_id).await?;
        update.apply(&mut policy)?;
        self.repos.policies().save(policy.clone()).await?;

        info!(
            %tenant_id,
            grace_period_minutes = policy.grace_period_minutes,
            overbooking_factor = %policy.overbooking_factor,
            "Booking policy updated"
        );
        Ok(policy)
    }
}
