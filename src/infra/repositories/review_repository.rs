//! Teacher review and counselor case persistence.
//!
//! Both tables hold at most one row per (report, reviewer). Writes are
//! upserts keyed on that pair so concurrent submissions converge on a
//! single row instead of racing a read-then-insert.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::counselor_case::{self, Entity as CaseEntity};
use super::entities::teacher_review::{self, Entity as ReviewEntity};
use crate::domain::{
    CaseStatus, CounselorCase, CounselorCaseInput, TeacherReview, TeacherReviewInput,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Teacher reviews for a report, oldest first
    async fn teacher_reviews(&self, report_id: Uuid) -> AppResult<Vec<TeacherReview>>;

    /// Counselor cases for a report, oldest first
    async fn counselor_cases(&self, report_id: Uuid) -> AppResult<Vec<CounselorCase>>;

    /// Counselor cases across several reports, newest first
    async fn cases_for_reports(&self, report_ids: Vec<Uuid>) -> AppResult<Vec<CounselorCase>>;
}

pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn teacher_reviews(&self, report_id: Uuid) -> AppResult<Vec<TeacherReview>> {
        let models = ReviewEntity::find()
            .filter(teacher_review::Column::ReportId.eq(report_id))
            .order_by_asc(teacher_review::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(TeacherReview::from).collect())
    }

    async fn counselor_cases(&self, report_id: Uuid) -> AppResult<Vec<CounselorCase>> {
        CaseEntity::find()
            .filter(counselor_case::Column::ReportId.eq(report_id))
            .order_by_asc(counselor_case::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(CounselorCase::try_from)
            .collect()
    }

    async fn cases_for_reports(&self, report_ids: Vec<Uuid>) -> AppResult<Vec<CounselorCase>> {
        if report_ids.is_empty() {
            return Ok(Vec::new());
        }

        CaseEntity::find()
            .filter(counselor_case::Column::ReportId.is_in(report_ids))
            .order_by_desc(counselor_case::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(CounselorCase::try_from)
            .collect()
    }
}

/// Insert or overwrite the teacher's review of a report.
pub(crate) async fn upsert_teacher_review<C: ConnectionTrait>(
    conn: &C,
    report_id: Uuid,
    teacher_id: Uuid,
    input: TeacherReviewInput,
) -> AppResult<TeacherReview> {
    let now = chrono::Utc::now();
    let active_model = teacher_review::ActiveModel {
        id: Set(Uuid::new_v4()),
        report_id: Set(report_id),
        teacher_id: Set(teacher_id),
        notes: Set(input.notes),
        action_taken: Set(input.action_taken),
        recommendation: Set(input.recommendation),
        disposition: Set(input.disposition.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    ReviewEntity::insert(active_model)
        .on_conflict(
            OnConflict::columns([
                teacher_review::Column::ReportId,
                teacher_review::Column::TeacherId,
            ])
            .update_columns([
                teacher_review::Column::Notes,
                teacher_review::Column::ActionTaken,
                teacher_review::Column::Recommendation,
                teacher_review::Column::Disposition,
                teacher_review::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let model = ReviewEntity::find()
        .filter(teacher_review::Column::ReportId.eq(report_id))
        .filter(teacher_review::Column::TeacherId.eq(teacher_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::internal("Teacher review missing after upsert"))?;

    Ok(TeacherReview::from(model))
}

/// Insert or overwrite the counselor's case record for a report.
pub(crate) async fn upsert_counselor_case<C: ConnectionTrait>(
    conn: &C,
    report_id: Uuid,
    counselor_id: Uuid,
    input: CounselorCaseInput,
) -> AppResult<CounselorCase> {
    let now = chrono::Utc::now();
    let active_model = counselor_case::ActiveModel {
        id: Set(Uuid::new_v4()),
        report_id: Set(report_id),
        counselor_id: Set(counselor_id),
        summary: Set(input.summary),
        counselor_notes: Set(input.counselor_notes),
        action_taken: Set(input.action_taken),
        recommendation: Set(input.recommendation),
        meeting_date: Set(input.meeting_date),
        follow_up_date: Set(input.follow_up_date),
        status: Set(input.status.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    CaseEntity::insert(active_model)
        .on_conflict(
            OnConflict::columns([
                counselor_case::Column::ReportId,
                counselor_case::Column::CounselorId,
            ])
            .update_columns([
                counselor_case::Column::Summary,
                counselor_case::Column::CounselorNotes,
                counselor_case::Column::ActionTaken,
                counselor_case::Column::Recommendation,
                counselor_case::Column::MeetingDate,
                counselor_case::Column::FollowUpDate,
                counselor_case::Column::Status,
                counselor_case::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let model = CaseEntity::find()
        .filter(counselor_case::Column::ReportId.eq(report_id))
        .filter(counselor_case::Column::CounselorId.eq(counselor_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::internal("Counselor case missing after upsert"))?;

    CounselorCase::try_from(model)
}

pub(crate) async fn case_with_status_exists<C: ConnectionTrait>(
    conn: &C,
    report_id: Uuid,
    status: CaseStatus,
) -> AppResult<bool> {
    let count = CaseEntity::find()
        .filter(counselor_case::Column::ReportId.eq(report_id))
        .filter(counselor_case::Column::Status.eq(status.as_str()))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Mark every case of a report settled. Returns the number of rows touched.
pub(crate) async fn settle_cases<C: ConnectionTrait>(conn: &C, report_id: Uuid) -> AppResult<u64> {
    let result = CaseEntity::update_many()
        .col_expr(
            counselor_case::Column::Status,
            Expr::value(CaseStatus::Settled.as_str()),
        )
        .col_expr(counselor_case::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(counselor_case::Column::ReportId.eq(report_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
