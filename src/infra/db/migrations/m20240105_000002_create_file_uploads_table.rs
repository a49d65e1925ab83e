//! Migration: Create file_uploads table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240105_000001_create_jobs_table::Jobs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FileUploads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FileUploads::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FileUploads::JobId).uuid().null())
                    .col(ColumnDef::new(FileUploads::UploaderId).uuid().not_null())
                    .col(
                        ColumnDef::new(FileUploads::FileKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FileUploads::FileName).string().not_null())
                    .col(ColumnDef::new(FileUploads::ContentType).string().not_null())
                    .col(
                        ColumnDef::new(FileUploads::SizeBytes)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FileUploads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FileUploads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_uploads_job")
                            .from(FileUploads::Table, FileUploads::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_uploads_uploader")
                            .from(FileUploads::Table, FileUploads::UploaderId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Draft claiming filters on the key prefix
        manager
            .create_index(
                Index::create()
                    .name("idx_file_uploads_file_key")
                    .table(FileUploads::Table)
                    .col(FileUploads::FileKey)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_uploads_job_id")
                    .table(FileUploads::Table)
                    .col(FileUploads::JobId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FileUploads::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FileUploads {
    Table,
    Id,
    JobId,
    UploaderId,
    FileKey,
    FileName,
    ContentType,
    SizeBytes,
    CreatedAt,
    UpdatedAt,
}
