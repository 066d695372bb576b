//! Public routes: anonymous submission and tracking.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use super::report_handler::{SubmitReportRequest, SubmittedReport};
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{ReportSnapshot, SubmissionChannel};
use crate::errors::AppResult;
use crate::types::ApiResponse;

pub fn anonymous_routes() -> Router<AppState> {
    Router::new()
        .route("/anonymous/report", post(submit_anonymous))
        .route("/track/:code", get(track_report))
}

/// File a report without an account
///
/// The tracking code in the response is the only way back to the report.
#[utoipa::path(
    post,
    path = "/anonymous/report",
    tag = "Public",
    request_body = SubmitReportRequest,
    responses(
        (status = 201, description = "Report filed", body = SubmittedReport),
        (status = 400, description = "Validation error")
    )
)]
pub async fn submit_anonymous(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SubmitReportRequest>,
) -> AppResult<(StatusCode, Json<SubmittedReport>)> {
    let report = state
        .report_service
        .submit(payload.into_new_report(SubmissionChannel::Anonymous, None))
        .await?;
    Ok((StatusCode::CREATED, Json(SubmittedReport::from(report))))
}

/// Look up a report's progress by tracking code
#[utoipa::path(
    get,
    path = "/track/{code}",
    tag = "Public",
    params(("code" = String, Path, description = "Tracking code, any case")),
    responses(
        (status = 200, description = "Report progress", body = ReportSnapshot),
        (status = 404, description = "No report with that code")
    )
)]
pub async fn track_report(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<ReportSnapshot>>> {
    let snapshot = state.report_service.track(&code).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}
