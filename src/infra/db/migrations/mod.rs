//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240105_000001_create_jobs_table;
mod m20240105_000002_create_file_uploads_table;
mod m20240105_000003_create_messages_table;
mod m20240110_000001_create_email_templates_table;
mod m20240110_000002_create_voucher_codes_table;
mod m20240115_000001_create_pricing_tables;
mod m20240120_000001_create_orders_and_payments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240105_000001_create_jobs_table::Migration),
            Box::new(m20240105_000002_create_file_uploads_table::Migration),
            Box::new(m20240105_000003_create_messages_table::Migration),
            Box::new(m20240110_000001_create_email_templates_table::Migration),
            Box::new(m20240110_000002_create_voucher_codes_table::Migration),
            Box::new(m20240115_000001_create_pricing_tables::Migration),
            Box::new(m20240120_000001_create_orders_and_payments::Migration),
        ]
    }
}
