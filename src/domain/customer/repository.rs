use async_trait::async_trait;
use uuid::Uuid;

use super::model::Customer;
use crate::domain::DomainResult;

#[async_trait]
pub trait CustomerRegistry: Send + Sync {
    async fn get_customer(&self, tenant_id: Uuid, customer_id: Uuid) -> DomainResult<Option<Customer>>;
}
