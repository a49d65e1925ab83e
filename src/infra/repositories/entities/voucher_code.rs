//! `voucher_codes` table entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "voucher_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub discount_kind: String,
    pub discount_value: i64,
    pub max_uses: i32,
    pub used_count: i32,
    pub valid_from: DateTimeUtc,
    pub valid_until: DateTimeUtc,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Voucher {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            kind: crate::domain::DiscountKind::from(m.discount_kind.as_str()),
            value: m.discount_value,
            max_uses: m.max_uses,
            used_count: m.used_count,
            valid_from: m.valid_from,
            valid_until: m.valid_until,
            active: m.active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
