//! Jetski entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jetskis")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub tenant_id: Uuid,
    pub model_id: Uuid,
    pub code: String,
    pub active: bool,

    /// Available, Rented, Maintenance
    pub status: String,

    pub created_at: DateTimeUtc,
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
