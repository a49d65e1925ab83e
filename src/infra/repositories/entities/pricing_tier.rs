//! `pricing_tiers` table entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pricing_tiers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub min_quantity: i32,
    pub unit_price_cents: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::PricingTier {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            min_quantity: m.min_quantity,
            unit_price_cents: m.unit_price_cents,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
