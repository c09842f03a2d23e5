//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub tenant_id: Uuid,
    pub model_id: Uuid,

    #[sea_orm(nullable)]
    pub jetski_id: Option<Uuid>,

    pub customer_id: Uuid,

    #[sea_orm(nullable)]
    pub seller_id: Option<Uuid>,

    pub start_at: DateTimeUtc,
    pub end_at: DateTimeUtc,

    /// Pending, Confirmed, Cancelled, Expired, Finalized
    pub status: String,

    /// Guaranteed, Overbooked
    pub priority: String,

    pub deposit_paid: bool,
    pub deposit_amount: Decimal,

    #[sea_orm(nullable)]
    pub deposit_paid_at: Option<DateTimeUtc>,

    pub expires_at: DateTimeUtc,
    pub active: bool,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    #[sea_orm(nullable)]
    pub rental_id: Option<Uuid>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jetski_model::Entity",
        from = "Column::ModelId",
        to = "super::jetski_model::Column::Id"
    )]
    JetskiModel,
}

impl Related<super::jetski_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JetskiModel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
