//! Shared fixtures for service unit tests.

use async_trait::async_trait;
use chrono::Utc;
use futures::future::BoxFuture;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    CounselingRepository, GuidanceRepository, MockCounselingRepository, MockGuidanceRepository,
    MockReportRepository, MockReviewRepository, MockUserRepository, ReportRepository,
    ReviewRepository, TransactionContext, UnitOfWork, UserRepository,
};

pub fn sample_user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        user_code: None,
        email: "user@school.edu".to_string(),
        username: "user".to_string(),
        password_hash: "hashed".to_string(),
        role,
        is_active: true,
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        year_level: None,
        position: None,
        created_at: now,
        updated_at: now,
    }
}

/// Unit of work over mocked repositories. Transactions are unsupported;
/// workflow writes are covered by the SQLite-backed integration tests.
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    reports: Arc<MockReportRepository>,
    reviews: Arc<MockReviewRepository>,
    counseling: Arc<MockCounselingRepository>,
    guidance: Arc<MockGuidanceRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            reports: Arc::new(MockReportRepository::new()),
            reviews: Arc::new(MockReviewRepository::new()),
            counseling: Arc::new(MockCounselingRepository::new()),
            guidance: Arc::new(MockGuidanceRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    pub fn with_users(users: MockUserRepository) -> Self {
        Self::default().and_users(users)
    }

    pub fn with_reports(reports: MockReportRepository, reviews: MockReviewRepository) -> Self {
        Self {
            reports: Arc::new(reports),
            reviews: Arc::new(reviews),
            ..Self::default()
        }
    }

    pub fn with_counseling(counseling: MockCounselingRepository) -> Self {
        Self {
            counseling: Arc::new(counseling),
            ..Self::default()
        }
    }

    pub fn with_guidance(guidance: MockGuidanceRepository) -> Self {
        Self {
            guidance: Arc::new(guidance),
            ..Self::default()
        }
    }

    /// Swap in a user repository alongside whatever else is mocked.
    pub fn and_users(self, users: MockUserRepository) -> Self {
        Self {
            users: Arc::new(users),
            ..self
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        self.reports.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    fn counseling(&self) -> Arc<dyn CounselingRepository> {
        self.counseling.clone()
    }

    fn guidance(&self) -> Arc<dyn GuidanceRepository> {
        self.guidance.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
