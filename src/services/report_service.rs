//! Report lifecycle engine.
//!
//! Owns every write to a report: submission, teacher review, and the
//! counselor case record. Each transition runs in a single unit-of-work
//! transaction so a review is never visible without the stage or status
//! change it implies.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::container::parallel;
use crate::domain::tracking_code::{generate_unique, insert_with_fresh_code};
use crate::domain::{
    CaseStatus, CounselorCase, CounselorCaseInput, NewReport, Report, ReportFilter, ReportScope,
    ReportSnapshot, ReportStatus, Stage, SubmissionChannel, TeacherReview, TeacherReviewInput,
    TrackingCode, UserResponse, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{dispatch, NotificationSink, UnitOfWork, WorkflowEvent};
use crate::types::PaginationParams;

/// Report with its full review trail
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    pub report: Report,
    pub teacher_reviews: Vec<TeacherReview>,
    pub counselor_cases: Vec<CounselorCase>,
}

/// Result of a teacher review: the stored review and the report after it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedReport {
    pub report: Report,
    pub review: TeacherReview,
}

/// Result of a counselor case write
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub report: Report,
    pub case: CounselorCase,
}

/// A student's record as seen by counselors
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentHistory {
    pub student: UserResponse,
    pub reports: Vec<Report>,
    pub counselor_cases: Vec<CounselorCase>,
}

#[async_trait]
pub trait ReportService: Send + Sync {
    /// File a new report at the start of the pipeline with a fresh tracking code.
    async fn submit(&self, report: NewReport) -> AppResult<Report>;

    /// Public status lookup by tracking code (any case).
    async fn track(&self, code: &str) -> AppResult<ReportSnapshot>;

    async fn list(
        &self,
        scope: ReportScope,
        stage: Option<Stage>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Report>, u64)>;

    /// Report plus reviews and cases. Out-of-scope reports are `NotFound`.
    async fn detail(&self, scope: ReportScope, report_id: Uuid) -> AppResult<ReportDetail>;

    /// Profile, reports and counselor cases of one student.
    async fn student_history(&self, student_id: Uuid) -> AppResult<StudentHistory>;

    /// Upsert the teacher's review and advance the report.
    async fn review_as_teacher(
        &self,
        teacher_id: Uuid,
        report_id: Uuid,
        input: TeacherReviewInput,
    ) -> AppResult<ReviewedReport>;

    /// Upsert the counselor's case record for a report.
    async fn record_case(
        &self,
        counselor_id: Uuid,
        report_id: Uuid,
        input: CounselorCaseInput,
    ) -> AppResult<CaseRecord>;
}

pub struct ReportEngine<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn NotificationSink>,
}

impl<U: UnitOfWork> ReportEngine<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { uow, notifier }
    }
}

#[async_trait]
impl<U: UnitOfWork> ReportService for ReportEngine<U> {
    async fn submit(&self, mut new_report: NewReport) -> AppResult<Report> {
        if new_report.channel == SubmissionChannel::Anonymous {
            new_report.submitted_by = None;
        } else if new_report.submitted_by.is_none() {
            return Err(AppError::internal("Identified submission without a submitter"));
        }

        for (field, value) in [
            ("Category", &new_report.category),
            ("Subject", &new_report.subject),
            ("Description", &new_report.description),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{} is required", field)));
            }
        }

        if let Some(student_id) = new_report.student_id {
            let student = self.uow.users().find_by_id(student_id).await?;
            if !matches!(student, Some(ref s) if s.is_active && s.role == UserRole::Student) {
                return Err(AppError::validation(
                    "studentId must name an active student account",
                ));
            }
        }

        // One transaction per attempt: a failed insert poisons the transaction it ran in.
        let uow = &self.uow;
        let report = insert_with_fresh_code(|| {
            let new_report = new_report.clone();
            uow.transaction(move |ctx| {
                Box::pin(async move {
                    let reports = ctx.reports();
                    let lookup = &reports;
                    let code = generate_unique(move |candidate| async move {
                        lookup.tracking_code_exists(&candidate).await
                    })
                    .await?;

                    reports.create(code, new_report).await
                })
            })
        })
        .await?;

        tracing::info!(
            report_id = %report.id,
            tracking_code = %report.tracking_code,
            channel = report.channel.as_str(),
            "Report submitted"
        );
        dispatch(
            self.notifier.as_ref(),
            WorkflowEvent::ReportSubmitted {
                report: report.clone(),
            },
        )
        .await;

        Ok(report)
    }

    async fn track(&self, code: &str) -> AppResult<ReportSnapshot> {
        // Malformed codes cannot match anything; answer the same as unknown ones.
        let code = TrackingCode::parse(code).map_err(|_| AppError::NotFound)?;

        let report = self
            .uow
            .reports()
            .find_by_tracking_code(&code)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(ReportSnapshot::from(report))
    }

    async fn list(
        &self,
        scope: ReportScope,
        stage: Option<Stage>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Report>, u64)> {
        let filter = ReportFilter {
            stage,
            submitted_by: match scope {
                ReportScope::All => None,
                ReportScope::Concerning(user_id) => Some(user_id),
            },
        };

        self.uow.reports().list(filter, &params).await
    }

    async fn detail(&self, scope: ReportScope, report_id: Uuid) -> AppResult<ReportDetail> {
        let report = self
            .uow
            .reports()
            .find_by_id(report_id)
            .await?
            .filter(|report| scope.permits(report))
            .ok_or(AppError::NotFound)?;

        let reviews = self.uow.reviews();
        let (teacher_reviews, counselor_cases) = parallel::join2(
            reviews.teacher_reviews(report_id),
            reviews.counselor_cases(report_id),
        )
        .await?;

        Ok(ReportDetail {
            report,
            teacher_reviews,
            counselor_cases,
        })
    }

    async fn student_history(&self, student_id: Uuid) -> AppResult<StudentHistory> {
        let student = self
            .uow
            .users()
            .find_by_id(student_id)
            .await?
            .filter(|user| user.role == UserRole::Student)
            .ok_or(AppError::NotFound)?;

        let reports = self.uow.reports().list_concerning(student_id).await?;
        let counselor_cases = self
            .uow
            .reviews()
            .cases_for_reports(reports.iter().map(|r| r.id).collect())
            .await?;

        Ok(StudentHistory {
            student: student.into(),
            reports,
            counselor_cases,
        })
    }

    async fn review_as_teacher(
        &self,
        teacher_id: Uuid,
        report_id: Uuid,
        input: TeacherReviewInput,
    ) -> AppResult<ReviewedReport> {
        if input.notes.trim().is_empty() {
            return Err(AppError::validation("Review notes are required"));
        }

        let forwards = input.disposition.forwards();
        let outcome = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let report = ctx
                        .reports()
                        .find_by_id(report_id)
                        .await?
                        .ok_or(AppError::NotFound)?;
                    if report.stage != Stage::TeacherReview {
                        return Err(AppError::precondition(format!(
                            "Report is in {} and no longer accepts teacher reviews",
                            report.stage
                        )));
                    }

                    let review = ctx
                        .reviews()
                        .upsert_teacher_review(report_id, teacher_id, input)
                        .await?;

                    let report = if forwards {
                        ctx.reports()
                            .advance(report_id, Stage::CounselorReview, ReportStatus::UnderReview)
                            .await?
                    } else {
                        ctx.reports()
                            .set_status(report_id, ReportStatus::UnderReview)
                            .await?
                    };

                    Ok::<_, AppError>(ReviewedReport { report, review })
                })
            })
            .await?;

        tracing::info!(
            report_id = %report_id,
            teacher_id = %teacher_id,
            stage = %outcome.report.stage,
            disposition = outcome.review.disposition.as_str(),
            "Teacher review recorded"
        );
        if forwards {
            dispatch(
                self.notifier.as_ref(),
                WorkflowEvent::ForwardedToCounselor {
                    report: outcome.report.clone(),
                    teacher_id,
                },
            )
            .await;
        }

        Ok(outcome)
    }

    async fn record_case(
        &self,
        counselor_id: Uuid,
        report_id: Uuid,
        input: CounselorCaseInput,
    ) -> AppResult<CaseRecord> {
        let outcome = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let report = ctx
                        .reports()
                        .find_by_id(report_id)
                        .await?
                        .ok_or(AppError::NotFound)?;
                    if report.stage != Stage::CounselorReview {
                        return Err(AppError::precondition(
                            "Report has not been forwarded to counseling",
                        ));
                    }

                    let case = ctx
                        .reviews()
                        .upsert_counselor_case(report_id, counselor_id, input)
                        .await?;

                    let status = match case.status {
                        CaseStatus::Settled => ReportStatus::Settled,
                        CaseStatus::InReview | CaseStatus::Confirmed => ReportStatus::UnderReview,
                    };
                    let report = ctx.reports().set_status(report_id, status).await?;

                    Ok::<_, AppError>(CaseRecord { report, case })
                })
            })
            .await?;

        tracing::info!(
            report_id = %report_id,
            counselor_id = %counselor_id,
            case_status = outcome.case.status.as_str(),
            "Counselor case recorded"
        );
        if outcome.case.status == CaseStatus::Confirmed {
            dispatch(
                self.notifier.as_ref(),
                WorkflowEvent::CaseConfirmed {
                    case: outcome.case.clone(),
                },
            )
            .await;
        }

        Ok(outcome)
    }
}
