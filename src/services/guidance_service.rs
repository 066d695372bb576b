//! Guest guidance desk.
//!
//! Guests file free-form guidance requests and follow their status;
//! counselors resolve or decline them with an optional response.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{GuidanceAction, GuidanceRequest, GuidanceStatus, NewGuidanceRequest};
use crate::errors::{AppError, AppResult};
use crate::infra::{dispatch, NotificationSink, UnitOfWork, WorkflowEvent};
use crate::types::PaginationParams;

#[async_trait]
pub trait GuidanceService: Send + Sync {
    async fn submit(
        &self,
        requester_id: Uuid,
        request: NewGuidanceRequest,
    ) -> AppResult<GuidanceRequest>;

    async fn my_requests(
        &self,
        requester_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<GuidanceRequest>, u64)>;

    async fn list(
        &self,
        status: Option<GuidanceStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<GuidanceRequest>, u64)>;

    /// Close a pending request. Closed requests stay closed.
    async fn resolve(
        &self,
        counselor_id: Uuid,
        request_id: Uuid,
        action: GuidanceAction,
        response: Option<String>,
    ) -> AppResult<GuidanceRequest>;
}

pub struct GuidanceDesk<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn NotificationSink>,
}

impl<U: UnitOfWork> GuidanceDesk<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { uow, notifier }
    }
}

#[async_trait]
impl<U: UnitOfWork> GuidanceService for GuidanceDesk<U> {
    async fn submit(
        &self,
        requester_id: Uuid,
        mut request: NewGuidanceRequest,
    ) -> AppResult<GuidanceRequest> {
        request.request_type = request.request_type.trim().to_ascii_lowercase();
        if request.request_type.is_empty() {
            return Err(AppError::validation("Request type is required"));
        }
        if request.description.trim().is_empty() {
            return Err(AppError::validation("Description is required"));
        }

        let created = self.uow.guidance().create(requester_id, request).await?;

        tracing::info!(
            request_id = %created.id,
            requester_id = %requester_id,
            "Guidance request filed"
        );
        dispatch(
            self.notifier.as_ref(),
            WorkflowEvent::GuidanceRequested {
                request: created.clone(),
            },
        )
        .await;

        Ok(created)
    }

    async fn my_requests(
        &self,
        requester_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<GuidanceRequest>, u64)> {
        self.uow
            .guidance()
            .list_for_requester(requester_id, &params)
            .await
    }

    async fn list(
        &self,
        status: Option<GuidanceStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<GuidanceRequest>, u64)> {
        self.uow.guidance().list(status, &params).await
    }

    async fn resolve(
        &self,
        counselor_id: Uuid,
        request_id: Uuid,
        action: GuidanceAction,
        response: Option<String>,
    ) -> AppResult<GuidanceRequest> {
        let response = response
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let closed = self
            .uow
            .guidance()
            .close(request_id, action, response, counselor_id)
            .await?;

        tracing::info!(
            request_id = %request_id,
            counselor_id = %counselor_id,
            status = closed.status.as_str(),
            "Guidance request closed"
        );
        dispatch(
            self.notifier.as_ref(),
            WorkflowEvent::GuidanceResolved {
                request: closed.clone(),
            },
        )
        .await;

        Ok(closed)
    }
}
