//! Student routes.

use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::report_handler::{report_page, SubmitReportRequest, SubmittedReport};
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    CounselingRequest, NewCounselingRequest, Priority, Report, SessionIdentity, SubmissionChannel,
};
use crate::errors::AppResult;
use crate::types::{
    ApiResponse, Paginated, PaginatedCounselingRequests, PaginatedReports, PaginationParams,
};

/// Counseling request against one of the student's reports
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounselingRequestBody {
    pub report_id: Uuid,
    #[validate(length(min = 1, message = "A reason for counseling is required"))]
    pub reason: String,
    #[schema(value_type = Option<String>, format = Date, example = "2024-04-02")]
    pub preferred_date: Option<NaiveDate>,
    pub urgency: Option<Priority>,
}

impl From<CounselingRequestBody> for NewCounselingRequest {
    fn from(body: CounselingRequestBody) -> Self {
        Self {
            report_id: body.report_id,
            reason: body.reason,
            preferred_date: body.preferred_date,
            urgency: body.urgency.unwrap_or_default(),
        }
    }
}

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/submit-report", post(submit_report))
        .route("/reports", get(my_reports))
        .route("/request-counseling", post(request_counseling))
        .route("/counseling-requests", get(my_counseling_requests))
}

/// Submit a report as the signed-in student
#[utoipa::path(
    post,
    path = "/student/submit-report",
    tag = "Student",
    security(("session" = [])),
    request_body = SubmitReportRequest,
    responses(
        (status = 201, description = "Report filed", body = SubmittedReport),
        (status = 400, description = "Validation error"),
        (status = 401, description = "No session"),
        (status = 403, description = "Not a student")
    )
)]
pub async fn submit_report(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SubmitReportRequest>,
) -> AppResult<(StatusCode, Json<SubmittedReport>)> {
    let new_report = payload.into_new_report(SubmissionChannel::Student, Some(session.user_id));
    let report = state.report_service.submit(new_report).await?;
    Ok((StatusCode::CREATED, Json(SubmittedReport::from(report))))
}

/// Reports the student filed or is named in, newest first
#[utoipa::path(
    get,
    path = "/student/reports",
    tag = "Student",
    security(("session" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Own reports", body = PaginatedReports),
        (status = 401, description = "No session"),
        (status = 403, description = "Not a student")
    )
)]
pub async fn my_reports(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Report>>> {
    Ok(Json(report_page(&state, &session, None, params).await?))
}

/// Ask for counseling on a report with a confirmed case
#[utoipa::path(
    post,
    path = "/student/request-counseling",
    tag = "Student",
    security(("session" = [])),
    request_body = CounselingRequestBody,
    responses(
        (status = 201, description = "Request opened", body = CounselingRequest),
        (status = 400, description = "Validation error or no confirmed case yet"),
        (status = 404, description = "Report not found among the student's reports"),
        (status = 409, description = "An open request already exists for this report")
    )
)]
pub async fn request_counseling(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CounselingRequestBody>,
) -> AppResult<(StatusCode, Json<ApiResponse<CounselingRequest>>)> {
    let request = state
        .counseling_service
        .request_counseling(session.user_id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(request))))
}

/// The student's counseling requests
#[utoipa::path(
    get,
    path = "/student/counseling-requests",
    tag = "Student",
    security(("session" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Own requests, newest first", body = PaginatedCounselingRequests),
        (status = 401, description = "No session"),
        (status = 403, description = "Not a student")
    )
)]
pub async fn my_counseling_requests(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<CounselingRequest>>> {
    let (requests, total) = state
        .counseling_service
        .requests_for_student(session.user_id, params)
        .await?;
    Ok(Json(Paginated::new(requests, params, total)))
}
