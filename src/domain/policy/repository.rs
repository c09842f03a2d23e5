//! Booking policy repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::BookingPolicy;
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingPolicyRepository: Send + Sync {
    async fn find(&self, tenant_id: Uuid) -> DomainResult<Option<BookingPolicy>>;

    /// Insert or replace the tenant's policy row
    async fn save(&self, policy: BookingPolicy) -> DomainResult<()>;
}
