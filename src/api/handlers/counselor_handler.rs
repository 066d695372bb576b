//! Counselor routes: case records, counseling and guidance requests,
//! and student history.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::report_handler::{non_blank, report_page, StageQuery};
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    CaseStatus, CounselingRequest, CounselorCaseInput, GuidanceAction, GuidanceRequest,
    GuidanceStatus, Report, RequestAction, RequestStatus, SessionIdentity,
};
use crate::errors::{AppError, AppResult};
use crate::services::{CaseRecord, StudentHistory};
use crate::types::{
    ApiResponse, Paginated, PaginatedCounselingRequests, PaginatedGuidanceRequests,
    PaginatedReports, PaginationParams,
};

/// Counselor case form
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecordRequest {
    pub summary: Option<String>,
    pub counselor_notes: Option<String>,
    pub action_taken: Option<String>,
    pub recommendation: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub meeting_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub follow_up_date: Option<NaiveDate>,
    /// `In Review` (default), `Confirmed` or `Settled`
    #[schema(example = "Confirmed")]
    pub status: Option<String>,
}

impl TryFrom<CaseRecordRequest> for CounselorCaseInput {
    type Error = AppError;

    fn try_from(req: CaseRecordRequest) -> Result<Self, Self::Error> {
        let status = match req.status.as_deref() {
            Some(label) => label.parse()?,
            None => CaseStatus::default(),
        };

        Ok(Self {
            summary: non_blank(req.summary),
            counselor_notes: non_blank(req.counselor_notes),
            action_taken: non_blank(req.action_taken),
            recommendation: non_blank(req.recommendation),
            meeting_date: req.meeting_date,
            follow_up_date: req.follow_up_date,
            status,
        })
    }
}

/// Counselor decision on a counseling request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequestBody {
    pub request_id: Uuid,
    /// `approve`, `reschedule`, `reject` or `complete`
    #[schema(example = "approve")]
    pub action: String,
    /// Required for approve and reschedule
    #[schema(value_type = Option<String>, format = Date, example = "2024-04-05")]
    pub scheduled_date: Option<NaiveDate>,
}

/// Counselor answer to a guest guidance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceDecisionBody {
    /// `resolve` or `decline`
    #[schema(example = "resolve")]
    pub action: String,
    /// Shown to the guest
    pub response: Option<String>,
}

/// `?status=` filter for the counselor's request queues
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestStatusQuery {
    pub status: Option<String>,
}

impl RequestStatusQuery {
    /// Parse the filter; blank means no filter.
    fn parse<S: std::str::FromStr<Err = AppError>>(&self) -> AppResult<Option<S>> {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<S>)
            .transpose()
    }
}

pub fn counselor_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/case-record/:report_id/review", post(record_case))
        .route(
            "/counseling-requests",
            get(list_requests).post(resolve_request),
        )
        .route("/guidance-requests", get(list_guidance_requests))
        .route("/guidance-requests/:id/resolve", post(resolve_guidance_request))
        .route("/student-history/:student_id", get(student_history))
}

/// All reports, optionally filtered by stage
#[utoipa::path(
    get,
    path = "/counselor/reports",
    tag = "Counselor",
    security(("session" = [])),
    params(StageQuery, PaginationParams),
    responses(
        (status = 200, description = "Reports, newest first", body = PaginatedReports),
        (status = 400, description = "Unknown stage"),
        (status = 403, description = "Not a counselor")
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

/// Record or update this counselor's case for a report
#[utoipa::path(
    post,
    path = "/counselor/case-record/{report_id}/review",
    tag = "Counselor",
    security(("session" = [])),
    params(("report_id" = Uuid, Path, description = "Report ID")),
    request_body = CaseRecordRequest,
    responses(
        (status = 200, description = "Case stored", body = CaseRecord),
        (status = 400, description = "Unknown case status or report not yet forwarded"),
        (status = 403, description = "Not a counselor"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn record_case(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CaseRecordRequest>,
) -> AppResult<Json<ApiResponse<CaseRecord>>> {
    let record = state
        .report_service
        .record_case(session.user_id, report_id, payload.try_into()?)
        .await?;
    Ok(Json(ApiResponse::success(record)))
}

/// Counseling requests, optionally filtered by status
#[utoipa::path(
    get,
    path = "/counselor/counseling-requests",
    tag = "Counselor",
    security(("session" = [])),
    params(RequestStatusQuery, PaginationParams),
    responses(
        (status = 200, description = "Requests, newest first", body = PaginatedCounselingRequests),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not a counselor")
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestStatusQuery>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<CounselingRequest>>> {
    let status = query.parse::<RequestStatus>()?;
    let (requests, total) = state
        .counseling_service
        .list_requests(status, params)
        .await?;
    Ok(Json(Paginated::new(requests, params, total)))
}

/// Approve, reschedule, reject or complete a counseling request
#[utoipa::path(
    post,
    path = "/counselor/counseling-requests",
    tag = "Counselor",
    security(("session" = [])),
    request_body = ResolveRequestBody,
    responses(
        (status = 200, description = "Request updated", body = CounselingRequest),
        (status = 400, description = "Missing date, unknown action or request already closed"),
        (status = 403, description = "Not a counselor"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn resolve_request(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResolveRequestBody>,
) -> AppResult<Json<ApiResponse<CounselingRequest>>> {
    let action: RequestAction = payload.action.parse()?;
    let scheduling = &state.counseling_service;

    let request = match action {
        RequestAction::Complete => {
            scheduling
                .complete_request(session.user_id, payload.request_id)
                .await?
        }
        _ => {
            scheduling
                .resolve_request(
                    session.user_id,
                    payload.request_id,
                    action,
                    payload.scheduled_date,
                )
                .await?
        }
    };

    Ok(Json(ApiResponse::success(request)))
}

/// Guest guidance requests, optionally filtered by status
#[utoipa::path(
    get,
    path = "/counselor/guidance-requests",
    tag = "Counselor",
    security(("session" = [])),
    params(RequestStatusQuery, PaginationParams),
    responses(
        (status = 200, description = "Requests, newest first", body = PaginatedGuidanceRequests),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not a counselor")
    )
)]
pub async fn list_guidance_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestStatusQuery>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<GuidanceRequest>>> {
    let status = query.parse::<GuidanceStatus>()?;
    let (requests, total) = state.guidance_service.list(status, params).await?;
    Ok(Json(Paginated::new(requests, params, total)))
}

/// Resolve or decline a guidance request
#[utoipa::path(
    post,
    path = "/counselor/guidance-requests/{id}/resolve",
    tag = "Counselor",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Guidance request ID")),
    request_body = GuidanceDecisionBody,
    responses(
        (status = 200, description = "Request closed", body = GuidanceRequest),
        (status = 400, description = "Unknown action or request already closed"),
        (status = 403, description = "Not a counselor"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn resolve_guidance_request(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<GuidanceDecisionBody>,
) -> AppResult<Json<ApiResponse<GuidanceRequest>>> {
    let action: GuidanceAction = payload.action.parse()?;
    let request = state
        .guidance_service
        .resolve(session.user_id, id, action, payload.response)
        .await?;
    Ok(Json(ApiResponse::success(request)))
}

/// A student's profile, reports and counselor cases
#[utoipa::path(
    get,
    path = "/counselor/student-history/{student_id}",
    tag = "Counselor",
    security(("session" = [])),
    params(("student_id" = Uuid, Path, description = "Student user ID")),
    responses(
        (status = 200, description = "Student history", body = StudentHistory),
        (status = 403, description = "Not a counselor"),
        (status = 404, description = "No such student")
    )
)]
pub async fn student_history(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StudentHistory>>> {
    let history = state.report_service.student_history(student_id).await?;
    Ok(Json(ApiResponse::success(history)))
}
