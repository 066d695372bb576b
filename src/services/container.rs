//! Service container: wires the services and offers a small parallel helper.
//!
//! Handlers depend on the service traits only; this container wires the
//! concrete implementations around one shared Unit of Work.

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, CounselingScheduler, CounselingService, GuidanceDesk,
    GuidanceService, ReportEngine, ReportService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{NotificationSink, Persistence, SessionStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn reports(&self) -> Arc<dyn ReportService>;

    fn counseling(&self) -> Arc<dyn CounselingService>;

    fn guidance(&self) -> Arc<dyn GuidanceService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    report_service: Arc<dyn ReportService>,
    counseling_service: Arc<dyn CounselingService>,
    guidance_service: Arc<dyn GuidanceService>,
}

impl Services {
    /// Build every service over a database connection.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        sessions: Arc<dyn SessionStore>,
        notifier: Arc<dyn NotificationSink>,
        config: Config,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), sessions, config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            report_service: Arc::new(ReportEngine::new(uow.clone(), notifier.clone())),
            counseling_service: Arc::new(CounselingScheduler::new(uow.clone(), notifier.clone())),
            guidance_service: Arc::new(GuidanceDesk::new(uow, notifier)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn reports(&self) -> Arc<dyn ReportService> {
        self.report_service.clone()
    }

    fn counseling(&self) -> Arc<dyn CounselingService> {
        self.counseling_service.clone()
    }

    fn guidance(&self) -> Arc<dyn GuidanceService> {
        self.guidance_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<i32> {
            Ok(2)
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn test_parallel_join2_propagates_failure() {
        async fn ok() -> AppResult<i32> {
            Ok(1)
        }
        async fn missing() -> AppResult<i32> {
            Err(AppError::NotFound)
        }

        assert!(matches!(
            parallel::join2(ok(), missing()).await,
            Err(AppError::NotFound)
        ));
    }
}
