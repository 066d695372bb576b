//! Application route configuration.

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, anonymous_routes, auth_routes, counselor_routes, guest_routes, health_routes,
    report_routes, session_routes, student_routes, teacher_routes,
};
use super::middleware::{require_roles, session_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::domain::UserRole;

const ANY_SESSION: &[UserRole] = &[];
const STUDENT: &[UserRole] = &[UserRole::Student];
const TEACHER: &[UserRole] = &[UserRole::Teacher];
const COUNSELOR: &[UserRole] = &[UserRole::Counselor];
const ADMIN: &[UserRole] = &[UserRole::Admin];
const GUEST: &[UserRole] = &[UserRole::Guest];
const REPORT_READERS: &[UserRole] = &[
    UserRole::Student,
    UserRole::Teacher,
    UserRole::Counselor,
    UserRole::Admin,
];

/// Restrict every route in `router` to sessions holding one of `allowed`.
fn gated(router: Router<AppState>, allowed: &'static [UserRole]) -> Router<AppState> {
    router.route_layer(middleware::from_fn(move |request: Request, next: Next| {
        require_roles(allowed, request, next)
    }))
}

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public
        .merge(anonymous_routes())
        .nest(
            "/auth",
            auth_routes().merge(gated(session_routes(), ANY_SESSION)),
        )
        // Role-gated
        .nest("/student", gated(student_routes(), STUDENT))
        .nest("/teacher", gated(teacher_routes(), TEACHER))
        .nest("/counselor", gated(counselor_routes(), COUNSELOR))
        .nest("/guest", gated(guest_routes(), GUEST))
        .nest("/reports", gated(report_routes(), REPORT_READERS))
        .nest("/admin", gated(admin_routes(), ADMIN))
        // Global middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "casetrack"
}
