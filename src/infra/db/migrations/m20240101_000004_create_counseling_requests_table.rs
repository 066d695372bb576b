//! Migration: Create counseling_requests table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_reports_table::Reports;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CounselingRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CounselingRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CounselingRequests::StudentId).uuid().not_null())
                    .col(ColumnDef::new(CounselingRequests::ReportId).uuid().null())
                    .col(ColumnDef::new(CounselingRequests::Reason).text().not_null())
                    .col(ColumnDef::new(CounselingRequests::PreferredDate).date().null())
                    .col(ColumnDef::new(CounselingRequests::ScheduledDate).date().null())
                    .col(
                        ColumnDef::new(CounselingRequests::Urgency)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CounselingRequests::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CounselingRequests::HandledBy).uuid().null())
                    .col(
                        ColumnDef::new(CounselingRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CounselingRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_counseling_requests_student")
                            .from(CounselingRequests::Table, CounselingRequests::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_counseling_requests_report")
                            .from(CounselingRequests::Table, CounselingRequests::ReportId)
                            .to(Reports::Table, Reports::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_counseling_requests_student_report")
                    .table(CounselingRequests::Table)
                    .col(CounselingRequests::StudentId)
                    .col(CounselingRequests::ReportId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CounselingRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CounselingRequests {
    Table,
    Id,
    StudentId,
    ReportId,
    Reason,
    PreferredDate,
    ScheduledDate,
    Urgency,
    Status,
    HandledBy,
    CreatedAt,
    UpdatedAt,
}
