//! Create booking_policies table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingPolicies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingPolicies::TenantId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::GracePeriodMinutes)
                            .big_integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::DepositPercentage)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::OverbookingFactor)
                            .decimal_len(6, 3)
                            .not_null()
                            .default(1.5),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::MaxWithoutDeposit)
                            .integer()
                            .not_null()
                            .default(8),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::NotificationLeadMinutes)
                            .big_integer()
                            .not_null()
                            .default(60),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingPolicies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingPolicies::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BookingPolicies {
    Table,
    TenantId,
    GracePeriodMinutes,
    DepositPercentage,
    OverbookingFactor,
    MaxWithoutDeposit,
    NotificationLeadMinutes,
    CreatedAt,
    UpdatedAt,
}
