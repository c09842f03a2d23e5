//! Jetski model entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jetski_models")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub tenant_id: Uuid,
    pub name: String,
    pub active: bool,

    /// Price per hour of billable usage
    pub hourly_price: Decimal,
    pub tolerance_minutes: i64,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::jetski::Entity")]
    Jetski,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservation,
}

impl Related<super::jetski::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jetski.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
