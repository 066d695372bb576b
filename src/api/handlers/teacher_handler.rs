//! Teacher routes.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::report_handler::{
    non_blank, report_page, StageQuery, SubmitReportRequest, SubmittedReport,
};
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Report, ReviewDisposition, SessionIdentity, SubmissionChannel, TeacherReviewInput,
};
use crate::errors::AppResult;
use crate::services::ReviewedReport;
use crate::types::{ApiResponse, Paginated, PaginatedReports, PaginationParams};

/// Teacher review form
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherReviewRequest {
    #[validate(length(min = 1, message = "Review notes are required"))]
    pub notes: String,
    pub action_taken: Option<String>,
    pub recommendation: Option<String>,
    /// Disposition label; `Forwarded to Counselor` hands the report on
    #[schema(example = "Forwarded to Counselor")]
    pub status: Option<String>,
}

impl From<TeacherReviewRequest> for TeacherReviewInput {
    fn from(req: TeacherReviewRequest) -> Self {
        Self {
            notes: req.notes,
            action_taken: non_blank(req.action_taken),
            recommendation: non_blank(req.recommendation),
            disposition: req
                .status
                .as_deref()
                .map(ReviewDisposition::from)
                .unwrap_or_default(),
        }
    }
}

pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/submit-incident", post(submit_incident))
        .route("/reports", get(list_reports))
        .route("/reports/:id/review", post(review_report))
}

/// File an incident, optionally naming the student involved
#[utoipa::path(
    post,
    path = "/teacher/submit-incident",
    tag = "Teacher",
    security(("session" = [])),
    request_body = SubmitReportRequest,
    responses(
        (status = 201, description = "Incident filed", body = SubmittedReport),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn submit_incident(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SubmitReportRequest>,
) -> AppResult<(StatusCode, Json<SubmittedReport>)> {
    let new_report = payload.into_new_report(SubmissionChannel::Teacher, Some(session.user_id));
    let report = state.report_service.submit(new_report).await?;
    Ok((StatusCode::CREATED, Json(SubmittedReport::from(report))))
}

/// All reports, optionally filtered by stage
#[utoipa::path(
    get,
    path = "/teacher/reports",
    tag = "Teacher",
    security(("session" = [])),
    params(StageQuery, PaginationParams),
    responses(
        (status = 200, description = "Reports, newest first", body = PaginatedReports),
        (status = 400, description = "Unknown stage"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn list_reports(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Query(filter): Query<StageQuery>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Report>>> {
    let stage = filter.stage()?;
    Ok(Json(report_page(&state, &session, stage, params).await?))
}

/// Record or update this teacher's review of a report
#[utoipa::path(
    post,
    path = "/teacher/reports/{id}/review",
    tag = "Teacher",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = TeacherReviewRequest,
    responses(
        (status = 200, description = "Review stored", body = ReviewedReport),
        (status = 400, description = "Validation error or report already with the counselor"),
        (status = 403, description = "Not a teacher"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn review_report(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<TeacherReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewedReport>>> {
    let reviewed = state
        .report_service
        .review_as_teacher(session.user_id, id, payload.into())
        .await?;
    Ok(Json(ApiResponse::success(reviewed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_status_maps_to_disposition() {
        let req = TeacherReviewRequest {
            notes: "Spoke with both students".into(),
            action_taken: Some(" ".into()),
            recommendation: None,
            status: Some("Forwarded to Counselor".into()),
        };
        let input = TeacherReviewInput::from(req);
        assert!(input.disposition.forwards());
        assert_eq!(input.action_taken, None);
    }

    #[test]
    fn test_missing_status_means_reviewed() {
        let req = TeacherReviewRequest {
            notes: "Noted".into(),
            action_taken: None,
            recommendation: None,
            status: None,
        };
        assert_eq!(
            TeacherReviewInput::from(req).disposition,
            ReviewDisposition::Reviewed
        );
    }
}
