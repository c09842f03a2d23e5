//! Create jetskis table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_jetski_models::JetskiModels;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jetskis::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jetskis::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jetskis::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Jetskis::ModelId).uuid().not_null())
                    .col(ColumnDef::new(Jetskis::Code).string().not_null())
                    .col(
                        ColumnDef::new(Jetskis::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Jetskis::Status)
                            .string()
                            .not_null()
                            .default("Available"),
                    )
                    .col(
                        ColumnDef::new(Jetskis::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jetskis_model")
                            .from(Jetskis::Table, Jetskis::ModelId)
                            .to(JetskiModels::Table, JetskiModels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jetskis_tenant_model")
                    .table(Jetskis::Table)
                    .col(Jetskis::TenantId)
                    .col(Jetskis::ModelId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jetskis::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Jetskis {
    Table,
    Id,
    TenantId,
    ModelId,
    Code,
    Active,
    Status,
    CreatedAt,
}
