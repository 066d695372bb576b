//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, anonymous_handler, auth_handler, counselor_handler, guest_handler,
    report_handler, student_handler, teacher_handler,
};
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{
    CaseStatus, CounselingRequest, CounselorCase, GuidanceAction, GuidanceRequest, GuidanceStatus,
    Priority, Report, ReportSnapshot, ReportStatus, RequestAction, RequestStatus, Stage,
    SubmissionChannel, TeacherReview, UserResponse, UserRole,
};
use crate::services::{CaseRecord, LoginResponse, ReportDetail, ReviewedReport, StudentHistory};
use crate::types::{
    MessageResponse, PaginatedCounselingRequests, PaginatedGuidanceRequests, PaginatedReports,
    PaginatedUsers, PaginationMeta,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Casetrack",
        version = "0.1.0",
        description = "Incident reports, review workflow and counseling requests"
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        anonymous_handler::submit_anonymous,
        anonymous_handler::track_report,
        student_handler::submit_report,
        student_handler::my_reports,
        student_handler::request_counseling,
        student_handler::my_counseling_requests,
        teacher_handler::submit_incident,
        teacher_handler::list_reports,
        teacher_handler::review_report,
        counselor_handler::list_reports,
        counselor_handler::record_case,
        counselor_handler::list_requests,
        counselor_handler::resolve_request,
        counselor_handler::list_guidance_requests,
        counselor_handler::resolve_guidance_request,
        counselor_handler::student_history,
        guest_handler::submit_request,
        guest_handler::request_status,
        report_handler::get_report,
        admin_handler::list_users,
        admin_handler::create_user,
        admin_handler::update_user,
        admin_handler::deactivate_user,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            Report,
            ReportSnapshot,
            ReportDetail,
            ReportStatus,
            Stage,
            Priority,
            SubmissionChannel,
            TeacherReview,
            CounselorCase,
            CaseStatus,
            CounselingRequest,
            RequestStatus,
            RequestAction,
            GuidanceRequest,
            GuidanceStatus,
            GuidanceAction,
            StudentHistory,
            ReviewedReport,
            CaseRecord,
            LoginResponse,
            MessageResponse,
            PaginationMeta,
            PaginatedReports,
            PaginatedUsers,
            PaginatedCounselingRequests,
            PaginatedGuidanceRequests,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            report_handler::SubmitReportRequest,
            report_handler::SubmittedReport,
            student_handler::CounselingRequestBody,
            teacher_handler::TeacherReviewRequest,
            counselor_handler::CaseRecordRequest,
            counselor_handler::ResolveRequestBody,
            counselor_handler::GuidanceDecisionBody,
            guest_handler::GuidanceRequestBody,
            admin_handler::CreateUserRequest,
            admin_handler::UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign in, sign out and self-registration"),
        (name = "Public", description = "Anonymous reporting and tracking"),
        (name = "Student", description = "Student reports and counseling requests"),
        (name = "Teacher", description = "Incident filing and teacher review"),
        (name = "Counselor", description = "Case records, scheduling, guidance and student history"),
        (name = "Guest", description = "Guidance requests from guest accounts"),
        (name = "Reports", description = "Report detail with review trail"),
        (name = "Admin", description = "Account administration")
    )
)]
pub struct ApiDoc;

/// Session cookie, with the same token accepted as a bearer header
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_workflow_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/login",
            "/track/{code}",
            "/teacher/reports/{id}/review",
            "/counselor/case-record/{report_id}/review",
            "/counselor/counseling-requests",
            "/admin/users/{id}",
            "/guest/submit-request",
            "/counselor/guidance-requests/{id}/resolve",
            "/counselor/student-history/{student_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
