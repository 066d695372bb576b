//! Report repository: read side of the lifecycle engine.
//!
//! Writes happen only inside a unit of work; the helpers below are shared
//! with the transactional repositories in `unit_of_work`.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::report::{self, ActiveModel, Entity as ReportEntity};
use crate::domain::{NewReport, Report, ReportFilter, ReportStatus, Stage, TrackingCode};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>>;

    /// Exact match on an already normalized code
    async fn find_by_tracking_code(&self, code: &TrackingCode) -> AppResult<Option<Report>>;

    /// Newest first. `submitted_by` matches the filer or the named student.
    async fn list(
        &self,
        filter: ReportFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Report>, u64)>;

    /// Every report a user filed or is named in, newest first
    async fn list_concerning(&self, user_id: Uuid) -> AppResult<Vec<Report>>;
}

pub struct ReportStore {
    db: DatabaseConnection,
}

impl ReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportRepository for ReportStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>> {
        find_report(&self.db, id).await
    }

    async fn find_by_tracking_code(&self, code: &TrackingCode) -> AppResult<Option<Report>> {
        ReportEntity::find()
            .filter(report::Column::TrackingCode.eq(code.as_str()))
            .one(&self.db)
            .await?
            .map(Report::try_from)
            .transpose()
    }

    async fn list(
        &self,
        filter: ReportFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Report>, u64)> {
        let mut query = ReportEntity::find().order_by_desc(report::Column::CreatedAt);
        if let Some(stage) = filter.stage {
            query = query.filter(report::Column::Stage.eq(stage.as_str()));
        }
        if let Some(user_id) = filter.submitted_by {
            query = query.filter(
                Condition::any()
                    .add(report::Column::SubmittedBy.eq(user_id))
                    .add(report::Column::StudentId.eq(user_id)),
            );
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        let reports = models
            .into_iter()
            .map(Report::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((reports, total))
    }

    async fn list_concerning(&self, user_id: Uuid) -> AppResult<Vec<Report>> {
        ReportEntity::find()
            .filter(
                Condition::any()
                    .add(report::Column::SubmittedBy.eq(user_id))
                    .add(report::Column::StudentId.eq(user_id)),
            )
            .order_by_desc(report::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Report::try_from)
            .collect()
    }
}

pub(crate) async fn find_report<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Report>> {
    ReportEntity::find_by_id(id)
        .one(conn)
        .await?
        .map(Report::try_from)
        .transpose()
}

pub(crate) async fn tracking_code_exists<C: ConnectionTrait>(
    conn: &C,
    code: &TrackingCode,
) -> AppResult<bool> {
    let count = ReportEntity::find()
        .filter(report::Column::TrackingCode.eq(code.as_str()))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Persist a new report at the start of the pipeline.
pub(crate) async fn insert_report<C: ConnectionTrait>(
    conn: &C,
    code: TrackingCode,
    new_report: NewReport,
) -> AppResult<Report> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        tracking_code: Set(code.into_string()),
        channel: Set(new_report.channel.as_str().to_string()),
        submitted_by: Set(new_report.submitted_by),
        student_id: Set(new_report.student_id),
        category: Set(new_report.category),
        subject: Set(new_report.subject),
        description: Set(new_report.description),
        location: Set(new_report.location),
        incident_date: Set(new_report.incident_date),
        persons_involved: Set(new_report.persons_involved),
        priority: Set(new_report.priority.as_str().to_string()),
        stage: Set(Stage::TeacherReview.as_str().to_string()),
        status: Set(ReportStatus::Submitted.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(conn).await?;
    Report::try_from(model)
}

/// Update stage and/or status together. `None` leaves a column untouched.
pub(crate) async fn update_progress<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    stage: Option<Stage>,
    status: ReportStatus,
) -> AppResult<Report> {
    let mut update = ReportEntity::update_many()
        .col_expr(report::Column::Status, Expr::value(status.as_str()))
        .col_expr(report::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(report::Column::Id.eq(id));
    if let Some(stage) = stage {
        update = update.col_expr(report::Column::Stage, Expr::value(stage.as_str()));
    }

    let result = update.exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    find_report(conn, id).await?.ok_or(AppError::NotFound)
}
