//! Guidance request persistence.
//!
//! Each write is a single statement, so no unit-of-work transaction is
//! needed. Closing a request is a conditional update on `status = pending`
//! so two counselors cannot both close the same request.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::guidance_request::{self, ActiveModel, Entity as GuidanceEntity};
use crate::domain::{GuidanceAction, GuidanceRequest, GuidanceStatus, NewGuidanceRequest};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GuidanceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<GuidanceRequest>>;

    async fn create(
        &self,
        requester_id: Uuid,
        request: NewGuidanceRequest,
    ) -> AppResult<GuidanceRequest>;

    /// A requester's own requests, newest first
    async fn list_for_requester(
        &self,
        requester_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<GuidanceRequest>, u64)>;

    /// Counselor queue, optionally narrowed to one status, newest first
    async fn list(
        &self,
        status: Option<GuidanceStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<GuidanceRequest>, u64)>;

    /// Close a pending request. Fails with `PreconditionFailed` once closed.
    async fn close(
        &self,
        id: Uuid,
        action: GuidanceAction,
        response: Option<String>,
        handled_by: Uuid,
    ) -> AppResult<GuidanceRequest>;
}

pub struct GuidanceStore {
    db: DatabaseConnection,
}

impl GuidanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GuidanceRepository for GuidanceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<GuidanceRequest>> {
        GuidanceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(GuidanceRequest::try_from)
            .transpose()
    }

    async fn create(
        &self,
        requester_id: Uuid,
        request: NewGuidanceRequest,
    ) -> AppResult<GuidanceRequest> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            requester_id: Set(requester_id),
            request_type: Set(request.request_type),
            description: Set(request.description),
            status: Set(GuidanceStatus::Pending.as_str().to_string()),
            response: Set(None),
            handled_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        GuidanceRequest::try_from(model)
    }

    async fn list_for_requester(
        &self,
        requester_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<GuidanceRequest>, u64)> {
        let query = GuidanceEntity::find()
            .filter(guidance_request::Column::RequesterId.eq(requester_id))
            .order_by_desc(guidance_request::Column::CreatedAt);

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let requests = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(GuidanceRequest::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((requests, total))
    }

    async fn list(
        &self,
        status: Option<GuidanceStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<GuidanceRequest>, u64)> {
        let mut query = GuidanceEntity::find().order_by_desc(guidance_request::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(guidance_request::Column::Status.eq(status.as_str()));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let requests = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(GuidanceRequest::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((requests, total))
    }

    async fn close(
        &self,
        id: Uuid,
        action: GuidanceAction,
        response: Option<String>,
        handled_by: Uuid,
    ) -> AppResult<GuidanceRequest> {
        let next = GuidanceStatus::Pending.apply(action)?;
        let result = GuidanceEntity::update_many()
            .col_expr(guidance_request::Column::Status, Expr::value(next.as_str()))
            .col_expr(guidance_request::Column::Response, Expr::value(response))
            .col_expr(guidance_request::Column::HandledBy, Expr::value(Some(handled_by)))
            .col_expr(
                guidance_request::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(guidance_request::Column::Id.eq(id))
            .filter(guidance_request::Column::Status.eq(GuidanceStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;

        let current = self.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if result.rows_affected == 0 {
            // Someone closed it first; report why this action no longer applies.
            current.status.apply(action)?;
        }
        Ok(current)
    }
}
