//! Migration: Create product_pricing and pricing_tiers tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductPricing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductPricing::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductPricing::ProductKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ProductPricing::DisplayName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductPricing::BasePriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductPricing::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ProductPricing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductPricing::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PricingTiers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingTiers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PricingTiers::ProductId).uuid().not_null())
                    .col(
                        ColumnDef::new(PricingTiers::MinQuantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingTiers::UnitPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingTiers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingTiers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pricing_tiers_product")
                            .from(PricingTiers::Table, PricingTiers::ProductId)
                            .to(ProductPricing::Table, ProductPricing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One tier per quantity break per product
        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_tiers_product_min_quantity")
                    .table(PricingTiers::Table)
                    .col(PricingTiers::ProductId)
                    .col(PricingTiers::MinQuantity)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricingTiers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductPricing::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProductPricing {
    Table,
    Id,
    ProductKey,
    DisplayName,
    BasePriceCents,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PricingTiers {
    Table,
    Id,
    ProductId,
    MinQuantity,
    UnitPriceCents,
    CreatedAt,
    UpdatedAt,
}
