//! End-to-end workflow tests against a migrated in-memory SQLite database.

mod common;

use chrono::NaiveDate;
use uuid::Uuid;

use casetrack::domain::{
    CaseStatus, CounselorCaseInput, NewCounselingRequest, Priority, ReportScope, ReportStatus,
    RequestAction, RequestStatus, ReviewDisposition, Stage, SubmissionChannel, TeacherReviewInput,
    UserRole,
};
use casetrack::domain::{GuidanceAction, GuidanceStatus, NewGuidanceRequest};
use casetrack::errors::{AppError, AppResult};
use casetrack::infra::{Persistence, UnitOfWork};
use casetrack::services::ServiceContainer;
use casetrack::types::PaginationParams;

use common::{create_user, harness, submission, PASSWORD};

fn forward(notes: &str) -> TeacherReviewInput {
    TeacherReviewInput {
        notes: notes.to_string(),
        action_taken: Some("Talked to both parties".to_string()),
        recommendation: None,
        disposition: ReviewDisposition::ForwardedToCounselor,
    }
}

fn case(status: CaseStatus) -> CounselorCaseInput {
    CounselorCaseInput {
        summary: Some("Initial interview done".to_string()),
        meeting_date: NaiveDate::from_ymd_opt(2024, 3, 20),
        status,
        ..Default::default()
    }
}

fn counseling(report_id: Uuid) -> NewCounselingRequest {
    NewCounselingRequest {
        report_id,
        reason: "Would like to talk about what happened".to_string(),
        preferred_date: NaiveDate::from_ymd_opt(2024, 3, 25),
        urgency: Priority::Normal,
    }
}

// =============================================================================
// Submission and tracking
// =============================================================================

#[tokio::test]
async fn test_submission_starts_in_teacher_review_with_unique_code() {
    let h = harness().await;
    let student = create_user(&h.services, "stud1", UserRole::Student).await;
    let reports = h.services.reports();

    let mut codes = std::collections::HashSet::new();
    for _ in 0..5 {
        let report = reports
            .submit(submission(SubmissionChannel::Student, Some(student.id)))
            .await
            .unwrap();
        assert_eq!(report.stage, Stage::TeacherReview);
        assert_eq!(report.status, ReportStatus::Submitted);

        let code = report.tracking_code.as_str();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert!(codes.insert(code.to_string()));
    }
}

#[tokio::test]
async fn test_anonymous_report_is_tracked_case_insensitively() {
    let h = harness().await;
    let reports = h.services.reports();

    let report = reports
        .submit(submission(SubmissionChannel::Anonymous, Some(Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(report.submitted_by, None);

    let lower = report.tracking_code.as_str().to_ascii_lowercase();
    let snapshot = reports.track(&lower).await.unwrap();
    assert_eq!(snapshot.tracking_code, report.tracking_code);
    assert_eq!(snapshot.stage, Stage::TeacherReview);

    assert!(matches!(reports.track("ZZ999999").await, Err(AppError::NotFound)));
    assert!(matches!(reports.track("short").await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_missing_subject_is_rejected() {
    let h = harness().await;
    let mut form = submission(SubmissionChannel::Anonymous, None);
    form.subject = String::new();

    let result = h.services.reports().submit(form).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

// =============================================================================
// Teacher review
// =============================================================================

#[tokio::test]
async fn test_teacher_review_upserts_per_teacher() {
    let h = harness().await;
    let student = create_user(&h.services, "stud2", UserRole::Student).await;
    let teacher_a = create_user(&h.services, "teach_a", UserRole::Teacher).await;
    let teacher_b = create_user(&h.services, "teach_b", UserRole::Teacher).await;
    let reports = h.services.reports();

    let report = reports
        .submit(submission(SubmissionChannel::Student, Some(student.id)))
        .await
        .unwrap();

    let reviewed = |notes: &str| TeacherReviewInput {
        notes: notes.to_string(),
        ..Default::default()
    };

    let first = reports
        .review_as_teacher(teacher_a.id, report.id, reviewed("first look"))
        .await
        .unwrap();
    assert_eq!(first.report.stage, Stage::TeacherReview);
    assert_eq!(first.report.status, ReportStatus::UnderReview);

    let second = reports
        .review_as_teacher(teacher_a.id, report.id, reviewed("updated notes"))
        .await
        .unwrap();
    assert_eq!(second.review.id, first.review.id);
    assert_eq!(second.review.notes, "updated notes");

    reports
        .review_as_teacher(teacher_b.id, report.id, reviewed("second opinion"))
        .await
        .unwrap();

    let detail = reports.detail(ReportScope::All, report.id).await.unwrap();
    assert_eq!(detail.teacher_reviews.len(), 2);
    let by_a: Vec<_> = detail
        .teacher_reviews
        .iter()
        .filter(|r| r.teacher_id == teacher_a.id)
        .collect();
    assert_eq!(by_a.len(), 1);
    assert_eq!(by_a[0].notes, "updated notes");
}

#[tokio::test]
async fn test_forwarding_moves_report_to_counselor() {
    let h = harness().await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let reports = h.services.reports();

    let report = reports
        .submit(submission(SubmissionChannel::Teacher, Some(teacher.id)))
        .await
        .unwrap();
    let outcome = reports
        .review_as_teacher(teacher.id, report.id, forward("needs counseling"))
        .await
        .unwrap();

    assert_eq!(outcome.report.stage, Stage::CounselorReview);
    assert_eq!(outcome.report.status, ReportStatus::UnderReview);
    assert!(h.notifier.names().contains(&"forwarded_to_counselor"));

    let (queue, total) = reports
        .list(
            ReportScope::All,
            Some(Stage::CounselorReview),
            PaginationParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(queue[0].id, report.id);

    // Once with the counselor, teachers can no longer review it.
    let late = reports
        .review_as_teacher(teacher.id, report.id, forward("again"))
        .await;
    assert!(matches!(late, Err(AppError::PreconditionFailed(_))));
}

#[tokio::test]
async fn test_review_of_unknown_report_is_not_found() {
    let h = harness().await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;

    let result = h
        .services
        .reports()
        .review_as_teacher(teacher.id, Uuid::new_v4(), forward("?"))
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

// =============================================================================
// Counselor case
// =============================================================================

#[tokio::test]
async fn test_case_requires_forwarded_report() {
    let h = harness().await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let counselor = create_user(&h.services, "couns", UserRole::Counselor).await;
    let reports = h.services.reports();

    let report = reports
        .submit(submission(SubmissionChannel::Student, Some(student.id)))
        .await
        .unwrap();
    let result = reports
        .record_case(counselor.id, report.id, case(CaseStatus::Confirmed))
        .await;
    assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
}

#[tokio::test]
async fn test_settled_case_settles_report() {
    let h = harness().await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let counselor = create_user(&h.services, "couns", UserRole::Counselor).await;
    let reports = h.services.reports();

    let report = reports
        .submit(submission(SubmissionChannel::Student, Some(student.id)))
        .await
        .unwrap();
    reports
        .review_as_teacher(teacher.id, report.id, forward("forwarding"))
        .await
        .unwrap();

    let confirmed = reports
        .record_case(counselor.id, report.id, case(CaseStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(confirmed.report.status, ReportStatus::UnderReview);

    let settled = reports
        .record_case(counselor.id, report.id, case(CaseStatus::Settled))
        .await
        .unwrap();
    assert_eq!(settled.case.id, confirmed.case.id);
    assert_eq!(settled.report.status, ReportStatus::Settled);
    assert_eq!(settled.report.stage, Stage::CounselorReview);
}

// =============================================================================
// Counseling requests
// =============================================================================

#[tokio::test]
async fn test_counseling_requires_confirmed_case() {
    let h = harness().await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let counselor = create_user(&h.services, "couns", UserRole::Counselor).await;
    let reports = h.services.reports();
    let scheduling = h.services.counseling();

    let report = reports
        .submit(submission(SubmissionChannel::Student, Some(student.id)))
        .await
        .unwrap();

    let early = scheduling
        .request_counseling(student.id, counseling(report.id))
        .await;
    assert!(matches!(early, Err(AppError::PreconditionFailed(_))));

    reports
        .review_as_teacher(teacher.id, report.id, forward("forwarding"))
        .await
        .unwrap();
    reports
        .record_case(counselor.id, report.id, case(CaseStatus::InReview))
        .await
        .unwrap();

    let still_early = scheduling
        .request_counseling(student.id, counseling(report.id))
        .await;
    assert!(matches!(still_early, Err(AppError::PreconditionFailed(_))));
}

#[tokio::test]
async fn test_full_counseling_flow_settles_report() {
    let h = harness().await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let other_student = create_user(&h.services, "stud_b", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let counselor = create_user(&h.services, "couns", UserRole::Counselor).await;
    let reports = h.services.reports();
    let scheduling = h.services.counseling();

    let report = reports
        .submit(submission(SubmissionChannel::Student, Some(student.id)))
        .await
        .unwrap();
    reports
        .review_as_teacher(teacher.id, report.id, forward("forwarding"))
        .await
        .unwrap();
    reports
        .record_case(counselor.id, report.id, case(CaseStatus::Confirmed))
        .await
        .unwrap();

    // Someone else's report is invisible to this student.
    let foreign = scheduling
        .request_counseling(other_student.id, counseling(report.id))
        .await;
    assert!(matches!(foreign, Err(AppError::NotFound)));

    let request = scheduling
        .request_counseling(student.id, counseling(report.id))
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);

    let duplicate = scheduling
        .request_counseling(student.id, counseling(report.id))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let no_date = scheduling
        .resolve_request(counselor.id, request.id, RequestAction::Approve, None)
        .await;
    assert!(matches!(no_date, Err(AppError::Validation(_))));

    let session_day = NaiveDate::from_ymd_opt(2024, 3, 28);
    let approved = scheduling
        .resolve_request(counselor.id, request.id, RequestAction::Approve, session_day)
        .await
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert_eq!(approved.scheduled_date, session_day);
    assert_eq!(approved.handled_by, Some(counselor.id));

    let completed = scheduling
        .complete_request(counselor.id, request.id)
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert_eq!(completed.scheduled_date, session_day);

    let detail = reports.detail(ReportScope::All, report.id).await.unwrap();
    assert_eq!(detail.report.status, ReportStatus::Settled);
    assert!(detail
        .counselor_cases
        .iter()
        .all(|c| c.status == CaseStatus::Settled));

    // Completing again changes nothing and sends nothing new.
    let resolved_events = |names: Vec<&str>| {
        names
            .into_iter()
            .filter(|n| *n == "counseling_resolved")
            .count()
    };
    let before = resolved_events(h.notifier.names());
    let again = scheduling
        .complete_request(counselor.id, request.id)
        .await
        .unwrap();
    assert_eq!(again.status, RequestStatus::Completed);
    assert_eq!(resolved_events(h.notifier.names()), before);

    let reopen = scheduling
        .resolve_request(counselor.id, request.id, RequestAction::Approve, session_day)
        .await;
    assert!(matches!(reopen, Err(AppError::PreconditionFailed(_))));

    let (mine, total) = scheduling
        .requests_for_student(student.id, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!((mine.len(), total), (1, 1));
    let (pending, _) = scheduling
        .list_requests(Some(RequestStatus::Pending), PaginationParams::default())
        .await
        .unwrap();
    assert!(pending.is_empty());
}

// =============================================================================
// Transaction atomicity
// =============================================================================

#[tokio::test]
async fn test_failed_review_transaction_leaves_no_review() {
    let h = harness().await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let report = h
        .services
        .reports()
        .submit(submission(SubmissionChannel::Student, Some(student.id)))
        .await
        .unwrap();
    let uow = Persistence::new(h.database.get_connection());

    let report_id = report.id;
    let teacher_id = teacher.id;
    let result: AppResult<()> = uow
        .transaction(move |ctx| {
            Box::pin(async move {
                ctx.reviews()
                    .upsert_teacher_review(report_id, teacher_id, forward("half done"))
                    .await?;
                ctx.reports()
                    .advance(report_id, Stage::CounselorReview, ReportStatus::UnderReview)
                    .await?;
                Err::<(), _>(AppError::internal("fail after the writes"))
            })
        })
        .await;
    assert!(matches!(result, Err(AppError::Internal(_))));

    assert!(uow.reviews().teacher_reviews(report_id).await.unwrap().is_empty());
    let after = uow.reports().find_by_id(report_id).await.unwrap().unwrap();
    assert_eq!(after.stage, Stage::TeacherReview);
    assert_eq!(after.status, ReportStatus::Submitted);
}

#[tokio::test]
async fn test_failed_completion_transaction_keeps_request_and_cases() {
    let h = harness().await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let counselor = create_user(&h.services, "couns", UserRole::Counselor).await;
    let reports = h.services.reports();
    let scheduling = h.services.counseling();

    let report = reports
        .submit(submission(SubmissionChannel::Student, Some(student.id)))
        .await
        .unwrap();
    reports
        .review_as_teacher(teacher.id, report.id, forward("forwarding"))
        .await
        .unwrap();
    reports
        .record_case(counselor.id, report.id, case(CaseStatus::Confirmed))
        .await
        .unwrap();
    let request = scheduling
        .request_counseling(student.id, counseling(report.id))
        .await
        .unwrap();
    scheduling
        .resolve_request(
            counselor.id,
            request.id,
            RequestAction::Approve,
            NaiveDate::from_ymd_opt(2024, 3, 28),
        )
        .await
        .unwrap();

    let uow = Persistence::new(h.database.get_connection());
    let (report_id, request_id, counselor_id) = (report.id, request.id, counselor.id);
    let result: AppResult<()> = uow
        .transaction(move |ctx| {
            Box::pin(async move {
                ctx.counseling()
                    .update(request_id, RequestStatus::Completed, None, counselor_id)
                    .await?;
                ctx.reviews().settle_cases(report_id).await?;
                ctx.reports()
                    .set_status(report_id, ReportStatus::Settled)
                    .await?;
                Err::<(), _>(AppError::internal("fail after the writes"))
            })
        })
        .await;
    assert!(result.is_err());

    let request_after = scheduling.get_request(request_id).await.unwrap();
    assert_eq!(request_after.status, RequestStatus::Approved);
    let cases = uow.reviews().counselor_cases(report_id).await.unwrap();
    assert!(cases.iter().all(|c| c.status == CaseStatus::Confirmed));
    let report_after = uow.reports().find_by_id(report_id).await.unwrap().unwrap();
    assert_eq!(report_after.status, ReportStatus::UnderReview);
}

#[tokio::test]
async fn test_rejected_request_is_final() {
    let h = harness().await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let counselor = create_user(&h.services, "couns", UserRole::Counselor).await;
    let reports = h.services.reports();
    let scheduling = h.services.counseling();

    // Teacher-filed report naming the student.
    let mut form = submission(SubmissionChannel::Teacher, Some(teacher.id));
    form.student_id = Some(student.id);
    let report = reports.submit(form).await.unwrap();
    reports
        .review_as_teacher(teacher.id, report.id, forward("forwarding"))
        .await
        .unwrap();
    reports
        .record_case(counselor.id, report.id, case(CaseStatus::Confirmed))
        .await
        .unwrap();

    let request = scheduling
        .request_counseling(student.id, counseling(report.id))
        .await
        .unwrap();
    let rejected = scheduling
        .resolve_request(counselor.id, request.id, RequestAction::Reject, None)
        .await
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);

    let complete = scheduling.complete_request(counselor.id, request.id).await;
    assert!(matches!(complete, Err(AppError::PreconditionFailed(_))));

    let report_after = reports.detail(ReportScope::All, report.id).await.unwrap();
    assert_eq!(report_after.report.status, ReportStatus::UnderReview);
}

// =============================================================================
// Visibility and accounts
// =============================================================================

#[tokio::test]
async fn test_student_sees_only_reports_concerning_them() {
    let h = harness().await;
    let alice = create_user(&h.services, "alice", UserRole::Student).await;
    let bob = create_user(&h.services, "bob", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let reports = h.services.reports();

    let own = reports
        .submit(submission(SubmissionChannel::Student, Some(alice.id)))
        .await
        .unwrap();
    let mut named = submission(SubmissionChannel::Teacher, Some(teacher.id));
    named.student_id = Some(alice.id);
    let named = reports.submit(named).await.unwrap();
    let others = reports
        .submit(submission(SubmissionChannel::Student, Some(bob.id)))
        .await
        .unwrap();

    let (visible, total) = reports
        .list(
            ReportScope::Concerning(alice.id),
            None,
            PaginationParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 2);
    let ids: Vec<_> = visible.iter().map(|r| r.id).collect();
    assert!(ids.contains(&own.id));
    assert!(ids.contains(&named.id));

    let hidden = reports
        .detail(ReportScope::Concerning(alice.id), others.id)
        .await;
    assert!(matches!(hidden, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_teacher_report_must_name_an_active_student() {
    let h = harness().await;
    let admin = create_user(&h.services, "admin", UserRole::Admin).await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let reports = h.services.reports();

    let mut names_teacher = submission(SubmissionChannel::Teacher, Some(teacher.id));
    names_teacher.student_id = Some(teacher.id);
    let result = reports.submit(names_teacher).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    h.services
        .users()
        .deactivate_user(student.id, admin.id)
        .await
        .unwrap();
    let mut names_leaver = submission(SubmissionChannel::Teacher, Some(teacher.id));
    names_leaver.student_id = Some(student.id);
    let result = reports.submit(names_leaver).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let (_, total) = reports
        .list(ReportScope::All, None, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_student_history_spans_filed_and_named_reports() {
    let h = harness().await;
    let student = create_user(&h.services, "stud", UserRole::Student).await;
    let bystander = create_user(&h.services, "other", UserRole::Student).await;
    let teacher = create_user(&h.services, "teach", UserRole::Teacher).await;
    let counselor = create_user(&h.services, "couns", UserRole::Counselor).await;
    let reports = h.services.reports();

    let own = reports
        .submit(submission(SubmissionChannel::Student, Some(student.id)))
        .await
        .unwrap();
    let mut named = submission(SubmissionChannel::Teacher, Some(teacher.id));
    named.student_id = Some(student.id);
    let named = reports.submit(named).await.unwrap();
    reports
        .submit(submission(SubmissionChannel::Student, Some(bystander.id)))
        .await
        .unwrap();

    reports
        .review_as_teacher(teacher.id, own.id, forward("forwarding"))
        .await
        .unwrap();
    reports
        .record_case(counselor.id, own.id, case(CaseStatus::InReview))
        .await
        .unwrap();

    let history = reports.student_history(student.id).await.unwrap();
    assert_eq!(history.student.id, student.id);
    let ids: Vec<_> = history.reports.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&own.id) && ids.contains(&named.id));
    assert_eq!(history.counselor_cases.len(), 1);
    assert_eq!(history.counselor_cases[0].report_id, own.id);

    let not_a_student = reports.student_history(teacher.id).await;
    assert!(matches!(not_a_student, Err(AppError::NotFound)));
}

// =============================================================================
// Guest guidance
// =============================================================================

#[tokio::test]
async fn test_guidance_request_is_closed_once() {
    let h = harness().await;
    let guest = create_user(&h.services, "parent", UserRole::Guest).await;
    let other_guest = create_user(&h.services, "visitor", UserRole::Guest).await;
    let counselor = create_user(&h.services, "couns", UserRole::Counselor).await;
    let guidance = h.services.guidance();

    let filed = guidance
        .submit(
            guest.id,
            NewGuidanceRequest {
                request_type: "Schedule".to_string(),
                description: "When is the next parent conference?".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(filed.status, GuidanceStatus::Pending);
    assert_eq!(filed.request_type, "schedule");

    let (mine, total) = guidance
        .my_requests(guest.id, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!((mine.len(), total), (1, 1));
    let (theirs, _) = guidance
        .my_requests(other_guest.id, PaginationParams::default())
        .await
        .unwrap();
    assert!(theirs.is_empty());

    let resolved = guidance
        .resolve(
            counselor.id,
            filed.id,
            GuidanceAction::Resolve,
            Some("Next Friday at 3pm".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(resolved.status, GuidanceStatus::Resolved);
    assert_eq!(resolved.handled_by, Some(counselor.id));
    assert_eq!(resolved.response.as_deref(), Some("Next Friday at 3pm"));

    let again = guidance
        .resolve(counselor.id, filed.id, GuidanceAction::Decline, None)
        .await;
    assert!(matches!(again, Err(AppError::PreconditionFailed(_))));

    let missing = guidance
        .resolve(counselor.id, Uuid::new_v4(), GuidanceAction::Resolve, None)
        .await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let (pending, _) = guidance
        .list(Some(GuidanceStatus::Pending), PaginationParams::default())
        .await
        .unwrap();
    assert!(pending.is_empty());
    assert!(h.notifier.names().contains(&"guidance_resolved"));
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let h = harness().await;
    create_user(&h.services, "known", UserRole::Teacher).await;
    let auth = h.services.auth();

    let wrong_password = auth.login("known", "not-the-password").await.unwrap_err();
    let unknown_user = auth.login("ghost", PASSWORD).await.unwrap_err();
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert!(matches!(wrong_password, AppError::InvalidCredentials));

    let ok = auth.login("known", PASSWORD).await.unwrap();
    assert_eq!(ok.redirect_hint, "/teacher/dashboard");
    assert_eq!(h.sessions.len(), 1);
}

#[tokio::test]
async fn test_deactivated_user_cannot_sign_in() {
    let h = harness().await;
    let admin = create_user(&h.services, "admin", UserRole::Admin).await;
    let student = create_user(&h.services, "leaver", UserRole::Student).await;
    let users = h.services.users();

    let self_service = users.deactivate_user(admin.id, admin.id).await;
    assert!(matches!(self_service, Err(AppError::Validation(_))));

    let deactivated = users.deactivate_user(student.id, admin.id).await.unwrap();
    assert!(!deactivated.is_active);

    let login = h.services.auth().login("leaver", PASSWORD).await;
    assert!(matches!(login, Err(AppError::InvalidCredentials)));

    // The row is kept.
    let persistence = Persistence::new(h.database.get_connection());
    assert!(persistence
        .users()
        .find_by_id(student.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let h = harness().await;
    create_user(&h.services, "taken", UserRole::Student).await;

    let result = h
        .services
        .auth()
        .register(common::account("taken", UserRole::Student))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}
