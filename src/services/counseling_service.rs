//! Counseling scheduling sub-flow.
//!
//! Students open requests against reports a counselor has confirmed;
//! counselors approve, reschedule, reject or complete them. Completion
//! settles every counselor case of the linked report in the same
//! transaction as the request update.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    CounselingRequest, NewCounselingRequest, ReportStatus, RequestAction, RequestStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{dispatch, NotificationSink, UnitOfWork, WorkflowEvent};
use crate::types::PaginationParams;

#[async_trait]
pub trait CounselingService: Send + Sync {
    /// Open a request on a report with a confirmed counselor case.
    async fn request_counseling(
        &self,
        student_id: Uuid,
        request: NewCounselingRequest,
    ) -> AppResult<CounselingRequest>;

    /// Apply a counselor decision. Approve and reschedule need a date.
    async fn resolve_request(
        &self,
        counselor_id: Uuid,
        request_id: Uuid,
        action: RequestAction,
        scheduled_date: Option<NaiveDate>,
    ) -> AppResult<CounselingRequest>;

    /// Mark a request completed and settle the linked report's cases.
    async fn complete_request(
        &self,
        counselor_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<CounselingRequest>;

    async fn get_request(&self, request_id: Uuid) -> AppResult<CounselingRequest>;

    async fn requests_for_student(
        &self,
        student_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<CounselingRequest>, u64)>;

    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<CounselingRequest>, u64)>;
}

pub struct CounselingScheduler<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn NotificationSink>,
}

impl<U: UnitOfWork> CounselingScheduler<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { uow, notifier }
    }
}

#[async_trait]
impl<U: UnitOfWork> CounselingService for CounselingScheduler<U> {
    async fn request_counseling(
        &self,
        student_id: Uuid,
        request: NewCounselingRequest,
    ) -> AppResult<CounselingRequest> {
        if request.reason.trim().is_empty() {
            return Err(AppError::validation("A reason for counseling is required"));
        }

        let created = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let report_id = request.report_id;
                    ctx.reports()
                        .find_by_id(report_id)
                        .await?
                        .filter(|report| report.concerns(student_id))
                        .ok_or(AppError::NotFound)?;

                    if !ctx.reviews().has_confirmed_case(report_id).await? {
                        return Err(AppError::precondition(
                            "Counseling can be requested once a counselor has confirmed the case",
                        ));
                    }

                    let counseling = ctx.counseling();
                    if counseling.open_request_exists(student_id, report_id).await? {
                        return Err(AppError::conflict("An open counseling request for this report"));
                    }

                    counseling.create(student_id, request).await
                })
            })
            .await?;

        tracing::info!(
            request_id = %created.id,
            student_id = %student_id,
            "Counseling request created"
        );
        dispatch(
            self.notifier.as_ref(),
            WorkflowEvent::CounselingRequested {
                request: created.clone(),
            },
        )
        .await;

        Ok(created)
    }

    async fn resolve_request(
        &self,
        counselor_id: Uuid,
        request_id: Uuid,
        action: RequestAction,
        scheduled_date: Option<NaiveDate>,
    ) -> AppResult<CounselingRequest> {
        if action.requires_schedule() && scheduled_date.is_none() {
            return Err(AppError::validation(
                "A scheduled date is required to approve or reschedule",
            ));
        }
        let scheduled_date = scheduled_date.filter(|_| action.requires_schedule());

        let (request, changed) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let counseling = ctx.counseling();
                    let current = counseling
                        .find_by_id(request_id)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    let next = current.status.apply(action)?;
                    if current.status == RequestStatus::Completed {
                        return Ok((current, false));
                    }

                    let updated = counseling
                        .update(request_id, next, scheduled_date, counselor_id)
                        .await?;

                    if next == RequestStatus::Completed {
                        if let Some(report_id) = updated.report_id {
                            let settled = ctx.reviews().settle_cases(report_id).await?;
                            ctx.reports()
                                .set_status(report_id, ReportStatus::Settled)
                                .await?;
                            tracing::debug!(report_id = %report_id, settled, "Cases settled");
                        }
                    }

                    Ok::<_, AppError>((updated, true))
                })
            })
            .await?;

        if changed {
            tracing::info!(
                request_id = %request_id,
                counselor_id = %counselor_id,
                status = request.status.as_str(),
                "Counseling request resolved"
            );
            dispatch(
                self.notifier.as_ref(),
                WorkflowEvent::CounselingResolved {
                    request: request.clone(),
                },
            )
            .await;
        }

        Ok(request)
    }

    async fn complete_request(
        &self,
        counselor_id: Uuid,
        request_id: Uuid,
    ) -> AppResult<CounselingRequest> {
        self.resolve_request(counselor_id, request_id, RequestAction::Complete, None)
            .await
    }

    async fn get_request(&self, request_id: Uuid) -> AppResult<CounselingRequest> {
        self.uow
            .counseling()
            .find_by_id(request_id)
            .await?
            .ok_or_not_found()
    }

    async fn requests_for_student(
        &self,
        student_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<CounselingRequest>, u64)> {
        self.uow.counseling().list_for_student(student_id, &params).await
    }

    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<CounselingRequest>, u64)> {
        self.uow.counseling().list(status, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockCounselingRepository, TracingNotifier};
    use crate::services::test_support::TestUnitOfWork;

    fn scheduler(repo: MockCounselingRepository) -> CounselingScheduler<TestUnitOfWork> {
        CounselingScheduler::new(
            Arc::new(TestUnitOfWork::with_counseling(repo)),
            Arc::new(TracingNotifier),
        )
    }

    #[tokio::test]
    async fn test_approve_requires_date() {
        let result = scheduler(MockCounselingRepository::new())
            .resolve_request(Uuid::new_v4(), Uuid::new_v4(), RequestAction::Approve, None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_reschedule_requires_date() {
        let result = scheduler(MockCounselingRepository::new())
            .resolve_request(Uuid::new_v4(), Uuid::new_v4(), RequestAction::Reschedule, None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_reason_rejected() {
        let result = scheduler(MockCounselingRepository::new())
            .request_counseling(
                Uuid::new_v4(),
                NewCounselingRequest {
                    report_id: Uuid::new_v4(),
                    reason: "   ".into(),
                    preferred_date: None,
                    urgency: Default::default(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_student_listing_reads_own_requests() {
        let student = Uuid::new_v4();
        let mut repo = MockCounselingRepository::new();
        repo.expect_list_for_student()
            .withf(move |id, params| *id == student && params.page == 2)
            .returning(|_, _| Ok((vec![], 0)));

        let (requests, total) = scheduler(repo)
            .requests_for_student(student, PaginationParams::new(2, 10))
            .await
            .unwrap();
        assert!(requests.is_empty());
        assert_eq!(total, 0);
    }
}
