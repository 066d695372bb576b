//! Migration: Create guidance_requests table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuidanceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuidanceRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GuidanceRequests::RequesterId).uuid().not_null())
                    .col(
                        ColumnDef::new(GuidanceRequests::RequestType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GuidanceRequests::Description).text().not_null())
                    .col(
                        ColumnDef::new(GuidanceRequests::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GuidanceRequests::Response).text().null())
                    .col(ColumnDef::new(GuidanceRequests::HandledBy).uuid().null())
                    .col(
                        ColumnDef::new(GuidanceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuidanceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guidance_requests_requester")
                            .from(GuidanceRequests::Table, GuidanceRequests::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guidance_requests_requester")
                    .table(GuidanceRequests::Table)
                    .col(GuidanceRequests::RequesterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuidanceRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GuidanceRequests {
    Table,
    Id,
    RequesterId,
    RequestType,
    Description,
    Status,
    Response,
    HandledBy,
    CreatedAt,
    UpdatedAt,
}
