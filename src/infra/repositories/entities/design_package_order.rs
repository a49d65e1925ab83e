//! `design_package_orders` table entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "design_package_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub job_id: Option<Uuid>,
    pub product_key: String,
    pub quantity: i32,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub voucher_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::DesignPackageOrder {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            job_id: m.job_id,
            product_key: m.product_key,
            quantity: m.quantity,
            subtotal_cents: m.subtotal_cents,
            discount_cents: m.discount_cents,
            total_cents: m.total_cents,
            voucher_id: m.voucher_id,
            status: crate::domain::OrderStatus::from(m.status.as_str()),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
