//! SeaORM implementation of CustomerRegistry

use async_trait::async_trait;
use log::debug;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::db_err;
use crate::domain::{Customer, CustomerRegistry, DomainResult};
use crate::infrastructure::database::entities::customer;

pub struct SeaOrmCustomerRegistry {
    db: DatabaseConnection,
}

impl SeaOrmCustomerRegistry {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, c: &Customer) -> DomainResult<()> {
        debug!("Inserting customer: {}", c.id);
        customer::ActiveModel {
            id: Set(c.id),
            tenant_id: Set(c.tenant_id),
            name: Set(c.name.clone()),
            active: Set(c.active),
            created_at: Set(c.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl CustomerRegistry for SeaOrmCustomerRegistry {
    async fn get_customer(&self, tenant_id: Uuid, customer_id: Uuid) -> DomainResult<Option<Customer>> {
        let model = customer::Entity::find_by_id(customer_id)
            .filter(customer::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| Customer {
            id: m.id,
            tenant_id: m.tenant_id,
            name: m.name,
            active: m.active,
            created_at: m.created_at,
        }))
    }
}
