//! Create reservations table
//!
//! Reservations reference a jetski model and optionally a physical jetski.
//! Indexed for the overlap and expiry queries.

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
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::ModelId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::JetskiId).uuid())
                    .col(ColumnDef::new(Reservations::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::SellerId).uuid())
                    .col(
                        ColumnDef::new(Reservations::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Reservations::Priority)
                            .string()
                            .not_null()
                            .default("Overbooked"),
                    )
                    .col(
                        ColumnDef::new(Reservations::DepositPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Reservations::DepositAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Reservations::DepositPaidAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Reservations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Reservations::Notes).text())
                    .col(ColumnDef::new(Reservations::RentalId).uuid())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_model")
                            .from(Reservations::Table, Reservations::ModelId)
                            .to(JetskiModels::Table, JetskiModels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_model_window")
                    .table(Reservations::Table)
                    .col(Reservations::TenantId)
                    .col(Reservations::ModelId)
                    .col(Reservations::StartAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_jetski")
                    .table(Reservations::Table)
                    .col(Reservations::JetskiId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_expiry")
                    .table(Reservations::Table)
                    .col(Reservations::Active)
                    .col(Reservations::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    TenantId,
    ModelId,
    JetskiId,
    CustomerId,
    SellerId,
    StartAt,
    EndAt,
    Status,
    Priority,
    DepositPaid,
    DepositAmount,
    DepositPaidAt,
    ExpiresAt,
    Active,
    Notes,
    RentalId,
    CreatedAt,
    UpdatedAt,
}
