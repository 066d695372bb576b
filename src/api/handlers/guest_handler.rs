//! Guest routes: guidance requests and their status.

use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{GuidanceRequest, NewGuidanceRequest, SessionIdentity};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Paginated, PaginatedGuidanceRequests, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceRequestBody {
    #[validate(length(min = 1, max = 64, message = "Request type must be 1 to 64 characters"))]
    #[schema(example = "enrollment")]
    pub request_type: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

impl From<GuidanceRequestBody> for NewGuidanceRequest {
    fn from(body: GuidanceRequestBody) -> Self {
        Self {
            request_type: body.request_type,
            description: body.description,
        }
    }
}

pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/submit-request", post(submit_request))
        .route("/request-status", get(request_status))
}

/// File a guidance request
#[utoipa::path(
    post,
    path = "/guest/submit-request",
    tag = "Guest",
    security(("session" = [])),
    request_body = GuidanceRequestBody,
    responses(
        (status = 201, description = "Request filed", body = GuidanceRequest),
        (status = 400, description = "Missing type or description"),
        (status = 403, description = "Not a guest")
    )
)]
pub async fn submit_request(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GuidanceRequestBody>,
) -> AppResult<(StatusCode, Json<ApiResponse<GuidanceRequest>>)> {
    let request = state
        .guidance_service
        .submit(session.user_id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(request))))
}

/// The guest's own guidance requests
#[utoipa::path(
    get,
    path = "/guest/request-status",
    tag = "Guest",
    security(("session" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Own requests, newest first", body = PaginatedGuidanceRequests),
        (status = 403, description = "Not a guest")
    )
)]
pub async fn request_status(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<GuidanceRequest>>> {
    let (requests, total) = state
        .guidance_service
        .my_requests(session.user_id, params)
        .await?;
    Ok(Json(Paginated::new(requests, params, total)))
}
