//! `product_pricing` table entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_pricing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub product_key: String,
    pub display_name: String,
    pub base_price_cents: i64,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::ProductPricing {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            product_key: m.product_key,
            display_name: m.display_name,
            base_price_cents: m.base_price_cents,
            active: m.active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
