//! Repository layer - Data access abstraction
//!
//! Each repository exposes a mockable trait over the pooled connection for
//! reads, plus crate-private query functions generic over the connection
//! so the same SQL runs inside a unit-of-work transaction.

mod counseling_repository;
pub(crate) mod entities;
mod guidance_repository;
mod report_repository;
mod review_repository;
mod user_repository;

pub use counseling_repository::{CounselingRepository, CounselingStore};
pub use guidance_repository::{GuidanceRepository, GuidanceStore};
pub use report_repository::{ReportRepository, ReportStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use counseling_repository::{
    find_request, insert_request, open_request_exists, update_request,
};
pub(crate) use report_repository::{find_report, insert_report, tracking_code_exists, update_progress};
pub(crate) use review_repository::{
    case_with_status_exists, settle_cases, upsert_counselor_case, upsert_teacher_review,
};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use counseling_repository::MockCounselingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use guidance_repository::MockGuidanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use report_repository::MockReportRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
