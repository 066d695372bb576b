//! Infrastructure layer - External systems integration
//!
//! - Database connections, migrations and repositories
//! - Redis-backed cache and the session store built on it
//! - Unit of Work for transaction management
//! - Notification sinks for workflow events

pub mod cache;
pub mod db;
pub mod notifications;
pub mod repositories;
pub mod session_store;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use notifications::{dispatch, NotificationSink, TracingNotifier, WorkflowEvent};
pub use repositories::{
    CounselingRepository, CounselingStore, GuidanceRepository, GuidanceStore, ReportRepository,
    ReportStore, ReviewRepository, ReviewStore, UserRepository, UserStore,
};
pub use session_store::{
    connect_session_store, MemorySessionStore, RedisSessionStore, SessionStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxCounselingRepository, TxReportRepository,
    TxReviewRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCounselingRepository, MockGuidanceRepository, MockReportRepository,
    MockReviewRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use session_store::MockSessionStore;
