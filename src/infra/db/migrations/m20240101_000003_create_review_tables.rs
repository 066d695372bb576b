//! Migration: Create teacher_reviews and counselor_cases tables.
//!
//! The composite unique indexes back the one-row-per-(report, reviewer)
//! upserts; engine logic alone cannot close the race between two writers.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_reports_table::Reports;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeacherReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherReviews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeacherReviews::ReportId).uuid().not_null())
                    .col(ColumnDef::new(TeacherReviews::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(TeacherReviews::Notes).text().not_null())
                    .col(ColumnDef::new(TeacherReviews::ActionTaken).string().null())
                    .col(ColumnDef::new(TeacherReviews::Recommendation).string().null())
                    .col(
                        ColumnDef::new(TeacherReviews::Disposition)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherReviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherReviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teacher_reviews_report")
                            .from(TeacherReviews::Table, TeacherReviews::ReportId)
                            .to(Reports::Table, Reports::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_teacher_reviews_report_teacher")
                    .table(TeacherReviews::Table)
                    .col(TeacherReviews::ReportId)
                    .col(TeacherReviews::TeacherId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CounselorCases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CounselorCases::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CounselorCases::ReportId).uuid().not_null())
                    .col(ColumnDef::new(CounselorCases::CounselorId).uuid().not_null())
                    .col(ColumnDef::new(CounselorCases::Summary).text().null())
                    .col(ColumnDef::new(CounselorCases::CounselorNotes).text().null())
                    .col(ColumnDef::new(CounselorCases::ActionTaken).string().null())
                    .col(ColumnDef::new(CounselorCases::Recommendation).string().null())
                    .col(ColumnDef::new(CounselorCases::MeetingDate).date().null())
                    .col(ColumnDef::new(CounselorCases::FollowUpDate).date().null())
                    .col(
                        ColumnDef::new(CounselorCases::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CounselorCases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CounselorCases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_counselor_cases_report")
                            .from(CounselorCases::Table, CounselorCases::ReportId)
                            .to(Reports::Table, Reports::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_counselor_cases_report_counselor")
                    .table(CounselorCases::Table)
                    .col(CounselorCases::ReportId)
                    .col(CounselorCases::CounselorId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CounselorCases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherReviews::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TeacherReviews {
    Table,
    Id,
    ReportId,
    TeacherId,
    Notes,
    ActionTaken,
    Recommendation,
    Disposition,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CounselorCases {
    Table,
    Id,
    ReportId,
    CounselorId,
    Summary,
    CounselorNotes,
    ActionTaken,
    Recommendation,
    MeetingDate,
    FollowUpDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
