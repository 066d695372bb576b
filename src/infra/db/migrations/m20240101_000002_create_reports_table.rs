//! Migration: Create reports table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reports::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Reports::TrackingCode)
                            .string_len(8)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Reports::Channel).string_len(16).not_null())
                    .col(ColumnDef::new(Reports::SubmittedBy).uuid().null())
                    .col(ColumnDef::new(Reports::StudentId).uuid().null())
                    .col(ColumnDef::new(Reports::Category).string_len(200).not_null())
                    .col(ColumnDef::new(Reports::Subject).string_len(200).not_null())
                    .col(ColumnDef::new(Reports::Description).text().not_null())
                    .col(ColumnDef::new(Reports::Location).string_len(200).null())
                    .col(ColumnDef::new(Reports::IncidentDate).date().null())
                    .col(ColumnDef::new(Reports::PersonsInvolved).string().null())
                    .col(ColumnDef::new(Reports::Priority).string_len(16).not_null())
                    .col(ColumnDef::new(Reports::Stage).string_len(32).not_null())
                    .col(ColumnDef::new(Reports::Status).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_submitted_by")
                    .table(Reports::Table)
                    .col(Reports::SubmittedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_stage")
                    .table(Reports::Table)
                    .col(Reports::Stage)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Reports {
    Table,
    Id,
    TrackingCode,
    Channel,
    SubmittedBy,
    StudentId,
    Category,
    Subject,
    Description,
    Location,
    IncidentDate,
    PersonsInvolved,
    Priority,
    Stage,
    Status,
    CreatedAt,
    UpdatedAt,
}
