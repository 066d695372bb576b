//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and on the Unit of Work for repository access
//! and transactions.

pub mod access;
mod auth_service;
pub mod container;
mod counseling_service;
mod guidance_service;
mod report_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use access::{authorize, report_scope};
pub use auth_service::{AuthService, Authenticator, Claims, LoginResponse};
pub use counseling_service::{CounselingScheduler, CounselingService};
pub use guidance_service::{GuidanceDesk, GuidanceService};
pub use report_service::{
    CaseRecord, ReportDetail, ReportEngine, ReportService, ReviewedReport, StudentHistory,
};
pub use user_service::{NewAccount, UserManager, UserService};

// Parallel execution utilities
pub use container::parallel;
