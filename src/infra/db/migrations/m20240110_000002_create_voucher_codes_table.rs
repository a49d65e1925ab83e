//! Migration: Create voucher_codes table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoucherCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoucherCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VoucherCodes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(VoucherCodes::DiscountKind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherCodes::DiscountValue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VoucherCodes::MaxUses).integer().not_null())
                    .col(
                        ColumnDef::new(VoucherCodes::UsedCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VoucherCodes::ValidFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherCodes::ValidUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherCodes::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(VoucherCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherCodes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoucherCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum VoucherCodes {
    Table,
    Id,
    Code,
    DiscountKind,
    DiscountValue,
    MaxUses,
    UsedCount,
    ValidFrom,
    ValidUntil,
    Active,
    CreatedAt,
    UpdatedAt,
}
