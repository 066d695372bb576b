//! Authentication handlers.

use axum::{
    extract::{Extension, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{SessionIdentity, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::{LoginResponse, NewAccount};
use crate::types::{ApiResponse, MessageResponse};

/// Self-registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "Username must be 3 to 64 characters"))]
    #[schema(example = "jdelacruz")]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jdelacruz@school.edu")]
    pub email: String,
    /// `student` (default) or `guest`
    pub role: Option<UserRole>,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    /// Student number
    pub user_code: Option<String>,
    #[schema(example = "Grade 9")]
    pub year_level: Option<String>,
}

impl From<RegisterRequest> for NewAccount {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            email: req.email,
            role: req.role.unwrap_or(UserRole::Student),
            first_name: req.first_name,
            last_name: req.last_name,
            user_code: req.user_code,
            year_level: req.year_level,
            position: None,
        }
    }
}

/// Login request. Blank fields are rejected by the authenticator.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jdelacruz")]
    pub username: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Routes open to everyone
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that need a session of any role
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

fn session_cookie(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE_NAME, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Register a student or guest account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error or non-registrable role"),
        (status = 409, description = "Username or user code already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.auth_service.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Sign in and open a session
///
/// Sets the session cookie and also returns the token for bearer use.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let response = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    let cookie = session_cookie(
        &response.access_token,
        response.expires_in,
        state.cookie_secure,
    );
    Ok(([(SET_COOKIE, cookie)], Json(response)))
}

/// Revoke the current session and clear the cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    security(("session" = [])),
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "No session")
    )
)]
pub async fn logout(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.auth_service.logout(&session.session_id).await?;

    let cookie = session_cookie("", 0, state.cookie_secure);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(MessageResponse::new("Signed out")),
    ))
}

/// Profile of the signed-in user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("session" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "No session")
    )
)]
pub async fn me(
    Extension(session): Extension<SessionIdentity>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.get_user(session.user_id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 2_592_000, false);
        assert_eq!(
            cookie,
            "casetrack_session=tok; HttpOnly; SameSite=Lax; Path=/; Max-Age=2592000"
        );
        assert!(session_cookie("", 0, true).ends_with("Max-Age=0; Secure"));
    }

    #[test]
    fn test_registration_defaults_to_student() {
        let req = RegisterRequest {
            username: "jdelacruz".into(),
            password: "SecurePass123!".into(),
            email: "j@school.edu".into(),
            role: None,
            first_name: "Juan".into(),
            last_name: "Dela Cruz".into(),
            user_code: None,
            year_level: Some("Grade 9".into()),
        };
        assert!(req.validate().is_ok());
        assert_eq!(NewAccount::from(req).role, UserRole::Student);
    }
}
