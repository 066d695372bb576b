//! Domain layer - Core business entities and rules.
//!
//! No I/O lives here: entities, value objects, and the pure parts of the
//! workflow (tracking code format, request status transitions).

pub mod counseling;
pub mod guidance;
pub mod password;
pub mod report;
pub mod review;
pub mod session;
pub mod tracking_code;
pub mod user;

pub use counseling::{CounselingRequest, NewCounselingRequest, RequestAction, RequestStatus};
pub use guidance::{GuidanceAction, GuidanceRequest, GuidanceStatus, NewGuidanceRequest};
pub use password::Password;
pub use report::{
    NewReport, Priority, Report, ReportFilter, ReportScope, ReportSnapshot, ReportStatus, Stage,
    SubmissionChannel,
};
pub use review::{
    CaseStatus, CounselorCase, CounselorCaseInput, ReviewDisposition, TeacherReview,
    TeacherReviewInput,
};
pub use session::SessionIdentity;
pub use tracking_code::TrackingCode;
pub use user::{NewUser, User, UserResponse, UserRole, UserUpdate};
