//! SeaORM implementation of BookingPolicyRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::db_err;
use crate::domain::{BookingPolicy, BookingPolicyRepository, DomainResult};
use crate::infrastructure::database::entities::booking_policy;

pub struct SeaOrmBookingPolicyRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingPolicyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: booking_policy::Model) -> BookingPolicy {
    BookingPolicy {
        tenant_id: m.tenant_id,
        grace_period_minutes: m.grace_period_minutes,
        deposit_percentage: m.deposit_percentage,
        overbooking_factor: m.overbooking_factor,
        max_without_deposit: u32::try_from(m.max_without_deposit).unwrap_or(0),
        notification_lead_minutes: m.notification_lead_minutes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl BookingPolicyRepository for SeaOrmBookingPolicyRepository {
    async fn find(&self, tenant_id: Uuid) -> DomainResult<Option<BookingPolicy>> {
        let model = booking_policy::Entity::find_by_id(tenant_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn save(&self, p: BookingPolicy) -> DomainResult<()> {
        debug!("Saving booking policy for tenant {}", p.tenant_id);

        let model = booking_policy::ActiveModel {
            tenant_id: Set(p.tenant_id),
            grace_period_minutes: Set(p.grace_period_minutes),
            deposit_percentage: Set(p.deposit_percentage),
            overbooking_factor: Set(p.overbooking_factor),
            max_without_deposit: Set(i32::try_from(p.max_without_deposit).unwrap_or(i32::MAX)),
            notification_lead_minutes: Set(p.notification_lead_minutes),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        };

        booking_policy::Entity::insert(model)
            .on_conflict(
                OnConflict::column(booking_policy::Column::TenantId)
                    .update_columns([
                        booking_policy::Column::GracePeriodMinutes,
                        booking_policy::Column::DepositPercentage,
                        booking_policy::Column::OverbookingFactor,
                        booking_policy::Column::MaxWithoutDeposit,
                        booking_policy::Column::NotificationLeadMinutes,
                        booking_policy::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
