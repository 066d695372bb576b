//! Report submission payloads and the shared report detail route.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::domain::{NewReport, Priority, Report, SessionIdentity, Stage, SubmissionChannel};
use crate::errors::AppResult;
use crate::services::{report_scope, ReportDetail};
use crate::types::{ApiResponse, Paginated, PaginationParams};

/// Incident report body, shared by the student, teacher and anonymous forms
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportRequest {
    #[validate(length(min = 1, max = 200, message = "Category is required"))]
    #[schema(example = "bullying")]
    pub category: String,
    #[validate(length(min = 1, max = 200, message = "Subject is required"))]
    #[schema(example = "Name calling near the lockers")]
    pub subject: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(max = 200, message = "Location is too long"))]
    pub location: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-18")]
    pub incident_date: Option<NaiveDate>,
    pub persons_involved: Option<String>,
    pub priority: Option<Priority>,
    /// Student the incident concerns. Only read on the teacher form.
    pub student_id: Option<Uuid>,
}

impl SubmitReportRequest {
    pub fn into_new_report(
        self,
        channel: SubmissionChannel,
        submitted_by: Option<Uuid>,
    ) -> NewReport {
        let student_id = match channel {
            SubmissionChannel::Teacher => self.student_id,
            _ => None,
        };

        NewReport {
            channel,
            submitted_by,
            student_id,
            category: self.category.trim().to_string(),
            subject: self.subject.trim().to_string(),
            description: self.description,
            location: non_blank(self.location),
            incident_date: self.incident_date,
            persons_involved: non_blank(self.persons_involved),
            priority: self.priority.unwrap_or_default(),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// What a submitter needs to follow up on a report
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedReport {
    pub success: bool,
    #[schema(example = "QK482913")]
    pub tracking_code: String,
    pub report_id: Uuid,
}

impl From<Report> for SubmittedReport {
    fn from(report: Report) -> Self {
        Self {
            success: true,
            tracking_code: report.tracking_code.into_string(),
            report_id: report.id,
        }
    }
}

/// `?stage=` filter for staff report lists
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StageQuery {
    /// `Teacher Review` or `Counselor Review`
    pub stage: Option<String>,
}

impl StageQuery {
    pub fn stage(&self) -> AppResult<Option<Stage>> {
        self.stage
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .transpose()
    }
}

/// Load one page of reports visible to `session`.
pub(crate) async fn report_page(
    state: &AppState,
    session: &SessionIdentity,
    stage: Option<Stage>,
    params: PaginationParams,
) -> AppResult<Paginated<Report>> {
    let (reports, total) = state
        .report_service
        .list(report_scope(session), stage, params)
        .await?;
    Ok(Paginated::new(reports, params, total))
}

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/:id", get(get_report))
}

/// Report with its teacher reviews and counselor cases
#[utoipa::path(
    get,
    path = "/reports/{id}",
    tag = "Reports",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report and review trail", body = ReportDetail),
        (status = 401, description = "No session"),
        (status = 403, description = "Role not permitted"),
        (status = 404, description = "Unknown report or not visible to the caller")
    )
)]
pub async fn get_report(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReportDetail>>> {
    let detail = state
        .report_service
        .detail(report_scope(&session), id)
        .await?;
    Ok(Json(ApiResponse::success(detail)))
}
