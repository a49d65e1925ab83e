//! `jobs` table entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub designer_id: Option<Uuid>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub brief: String,
    pub product_key: Option<String>,
    pub status: String,
    #[sea_orm(unique)]
    pub draft_token: Option<String>,
    pub submitted_at: Option<DateTimeUtc>,
    pub due_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Job {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            designer_id: m.designer_id,
            title: m.title,
            brief: m.brief,
            product_key: m.product_key,
            status: crate::domain::JobStatus::from(m.status.as_str()),
            draft_token: m.draft_token,
            submitted_at: m.submitted_at,
            due_date: m.due_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
