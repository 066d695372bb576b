//! Administrator routes: account provisioning and maintenance.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{SessionIdentity, UserResponse, UserRole, UserUpdate};
use crate::errors::AppResult;
use crate::services::NewAccount;
use crate::types::{ApiResponse, Paginated, PaginatedUsers, PaginationParams};

/// Account created by an administrator; any role is allowed
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 64, message = "Username must be 3 to 64 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: UserRole,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    /// Student number or employee code
    pub user_code: Option<String>,
    pub year_level: Option<String>,
    #[schema(example = "Guidance Counselor")]
    pub position: Option<String>,
}

impl From<CreateUserRequest> for NewAccount {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            email: req.email,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            user_code: req.user_code,
            year_level: req.year_level,
            position: req.position,
        }
    }
}

/// Partial account edit; omitted fields stay as they are
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub role: Option<UserRole>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "First name cannot be blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be blank"))]
    pub last_name: Option<String>,
    pub user_code: Option<String>,
    pub year_level: Option<String>,
    pub position: Option<String>,
    /// `true` reactivates, `false` deactivates
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            role: req.role,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            user_code: req.user_code,
            year_level: req.year_level,
            position: req.position,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoleQuery {
    pub role: Option<UserRole>,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(deactivate_user))
}

/// List accounts, optionally by role
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("session" = [])),
    params(RoleQuery, PaginationParams),
    responses(
        (status = 200, description = "Accounts", body = PaginatedUsers),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let (users, total) = state.user_service.list_users(query.role, params).await?;
    Ok(Json(
        Paginated::new(users, params, total).map(UserResponse::from),
    ))
}

/// Provision an account of any role
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "Admin",
    security(("session" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not an administrator"),
        (status = 409, description = "Username or user code already taken")
    )
)]
pub async fn create_user(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state.user_service.create_user(payload.into()).await?;
    tracing::info!(
        admin_id = %session.user_id,
        user_id = %user.id,
        role = %user.role,
        "Account provisioned"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserResponse::from(user))),
    ))
}

/// Deactivate an account. Rows are kept; the user just cannot sign in.
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account deactivated", body = UserResponse),
        (status = 400, description = "Administrators cannot deactivate themselves"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found")
    )
)]
pub async fn deactivate_user(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_service
        .deactivate_user(id, session.user_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Account deactivated",
    )))
}

/// Edit an account: role, profile fields, or reactivation
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Empty edit, or an administrator editing away their own access"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User code already taken")
    )
)]
pub async fn update_user(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .user_service
        .update_user(id, payload.into(), session.user_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Account updated",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_keeps_omitted_fields_unset() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{ "isActive": true, "role": "teacher" }"#).unwrap();
        let changes = UserUpdate::from(req);

        assert_eq!(changes.is_active, Some(true));
        assert_eq!(changes.role, Some(UserRole::Teacher));
        assert!(changes.email.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_update_request_rejects_blank_names() {
        let req = UpdateUserRequest {
            first_name: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
