//! `payments` table entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub provider_intent_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Payment {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            provider_intent_id: m.provider_intent_id,
            amount_cents: m.amount_cents,
            currency: m.currency,
            status: crate::domain::PaymentStatus::from(m.status.as_str()),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
