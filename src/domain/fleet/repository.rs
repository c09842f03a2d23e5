//! Fleet registry interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Jetski, JetskiModel};
use crate::domain::DomainResult;

/// Read access to jetski models and units.
///
/// Lookups are tenant-scoped: a record owned by another tenant is `None`.
#[async_trait]
pub trait FleetRegistry: Send + Sync {
    async fn get_model(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<Option<JetskiModel>>;

    async fn get_jetski(&self, tenant_id: Uuid, jetski_id: Uuid) -> DomainResult<Option<Jetski>>;

    /// Active jetskis of the model whose status is `Available`.
    async fn count_available_jetskis(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<u32>;
}
