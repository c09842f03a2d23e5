//! Create jetski_models table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JetskiModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JetskiModels::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JetskiModels::TenantId).uuid().not_null())
                    .col(ColumnDef::new(JetskiModels::Name).string().not_null())
                    .col(
                        ColumnDef::new(JetskiModels::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(JetskiModels::HourlyPrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JetskiModels::ToleranceMinutes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(JetskiModels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jetski_models_tenant")
                    .table(JetskiModels::Table)
                    .col(JetskiModels::TenantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JetskiModels::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum JetskiModels {
    Table,
    Id,
    TenantId,
    Name,
    Active,
    HourlyPrice,
    ToleranceMinutes,
    CreatedAt,
}
