//! SeaORM implementation of FleetRegistry

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::{DomainResult, FleetRegistry, Jetski, JetskiModel, JetskiStatus};
use crate::infrastructure::database::entities::{jetski, jetski_model};

pub struct SeaOrmFleetRegistry {
    db: DatabaseConnection,
}

impl SeaOrmFleetRegistry {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a model. Fleet management proper lives outside this crate;
    /// this is for seeding and the CLI.
    pub async fn insert_model(&self, m: &JetskiModel) -> DomainResult<()> {
        debug!("Inserting jetski model: {}", m.id);
        jetski_model::ActiveModel {
            id: Set(m.id),
            tenant_id: Set(m.tenant_id),
            name: Set(m.name.clone()),
            active: Set(m.active),
            hourly_price: Set(m.hourly_price),
            tolerance_minutes: Set(m.tolerance_minutes),
            created_at: Set(m.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    pub async fn insert_jetski(&self, j: &Jetski) -> DomainResult<()> {
        debug!("Inserting jetski: {} ({})", j.code, j.id);
        jetski::ActiveModel {
            id: Set(j.id),
            tenant_id: Set(j.tenant_id),
            model_id: Set(j.model_id),
            code: Set(j.code.clone()),
            active: Set(j.active),
            status: Set(j.status.as_str().to_string()),
            created_at: Set(j.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

fn model_to_domain(m: jetski_model::Model) -> JetskiModel {
    JetskiModel {
        id: m.id,
        tenant_id: m.tenant_id,
        name: m.name,
        active: m.active,
        hourly_price: m.hourly_price,
        tolerance_minutes: m.tolerance_minutes,
        created_at: m.created_at,
    }
}

fn jetski_to_domain(m: jetski::Model) -> Jetski {
    Jetski {
        id: m.id,
        tenant_id: m.tenant_id,
        model_id: m.model_id,
        code: m.code,
        active: m.active,
        status: JetskiStatus::from_str(&m.status),
        created_at: m.created_at,
    }
}

#[async_trait]
impl FleetRegistry for SeaOrmFleetRegistry {
    async fn get_model(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<Option<JetskiModel>> {
        let model = jetski_model::Entity::find_by_id(model_id)
            .filter(jetski_model::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn get_jetski(&self, tenant_id: Uuid, jetski_id: Uuid) -> DomainResult<Option<Jetski>> {
        let model = jetski::Entity::find_by_id(jetski_id)
            .filter(jetski::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(jetski_to_domain))
    }

    async fn count_available_jetskis(&self, tenant_id: Uuid, model_id: Uuid) -> DomainResult<u32> {
        let count = jetski::Entity::find()
            .filter(jetski::Column::TenantId.eq(tenant_id))
            .filter(jetski::Column::ModelId.eq(model_id))
            .filter(jetski::Column::Active.eq(true))
            .filter(jetski::Column::Status.eq(JetskiStatus::Available.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
