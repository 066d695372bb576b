//! Counseling request persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::counseling_request::{self, ActiveModel, Entity as RequestEntity};
use crate::domain::{CounselingRequest, NewCounselingRequest, RequestStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CounselingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CounselingRequest>>;

    /// A student's own requests, newest first
    async fn list_for_student(
        &self,
        student_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<CounselingRequest>, u64)>;

    /// Counselor queue, optionally narrowed to one status, newest first
    async fn list(
        &self,
        status: Option<RequestStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<CounselingRequest>, u64)>;
}

pub struct CounselingStore {
    db: DatabaseConnection,
}

impl CounselingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CounselingRepository for CounselingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CounselingRequest>> {
        find_request(&self.db, id).await
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<CounselingRequest>, u64)> {
        let query = RequestEntity::find()
            .filter(counseling_request::Column::StudentId.eq(student_id))
            .order_by_desc(counseling_request::Column::CreatedAt);

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let requests = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(CounselingRequest::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((requests, total))
    }

    async fn list(
        &self,
        status: Option<RequestStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<CounselingRequest>, u64)> {
        let mut query =
            RequestEntity::find().order_by_desc(counseling_request::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(counseling_request::Column::Status.eq(status.as_str()));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let requests = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(CounselingRequest::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((requests, total))
    }
}

pub(crate) async fn find_request<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<Option<CounselingRequest>> {
    RequestEntity::find_by_id(id)
        .one(conn)
        .await?
        .map(CounselingRequest::try_from)
        .transpose()
}

/// Whether the student already has a pending, approved or rescheduled
/// request for the report.
pub(crate) async fn open_request_exists<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
    report_id: Uuid,
) -> AppResult<bool> {
    let open: Vec<&str> = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rescheduled,
    ]
    .iter()
    .map(RequestStatus::as_str)
    .collect();

    let count = RequestEntity::find()
        .filter(counseling_request::Column::StudentId.eq(student_id))
        .filter(counseling_request::Column::ReportId.eq(report_id))
        .filter(counseling_request::Column::Status.is_in(open))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub(crate) async fn insert_request<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
    request: NewCounselingRequest,
) -> AppResult<CounselingRequest> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student_id),
        report_id: Set(Some(request.report_id)),
        reason: Set(request.reason),
        preferred_date: Set(request.preferred_date),
        scheduled_date: Set(None),
        urgency: Set(request.urgency.as_str().to_string()),
        status: Set(RequestStatus::Pending.as_str().to_string()),
        handled_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(conn).await?;
    CounselingRequest::try_from(model)
}

/// Record a counselor decision. `scheduled_date` of `None` keeps the
/// existing date.
pub(crate) async fn update_request<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    status: RequestStatus,
    scheduled_date: Option<NaiveDate>,
    handled_by: Uuid,
) -> AppResult<CounselingRequest> {
    let model = RequestEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = model.into();
    active.status = Set(status.as_str().to_string());
    if let Some(date) = scheduled_date {
        active.scheduled_date = Set(Some(date));
    }
    active.handled_by = Set(Some(handled_by));
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(conn).await?;
    CounselingRequest::try_from(model)
}
