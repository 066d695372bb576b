//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, NotificationSink, SessionStore, TracingNotifier};
use crate::services::{
    AuthService, CounselingService, GuidanceService, ReportService, ServiceContainer, Services,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub report_service: Arc<dyn ReportService>,
    pub counseling_service: Arc<dyn CounselingService>,
    pub guidance_service: Arc<dyn GuidanceService>,
    /// Session backend, checked by the health endpoint
    pub sessions: Arc<dyn SessionStore>,
    pub database: Arc<Database>,
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,
}

impl AppState {
    /// Create application state with the default logging notifier.
    pub fn from_config(
        database: Arc<Database>,
        sessions: Arc<dyn SessionStore>,
        config: Config,
    ) -> Self {
        Self::with_notifier(database, sessions, Arc::new(TracingNotifier), config)
    }

    /// Create application state with an explicit notification sink.
    pub fn with_notifier(
        database: Arc<Database>,
        sessions: Arc<dyn SessionStore>,
        notifier: Arc<dyn NotificationSink>,
        config: Config,
    ) -> Self {
        let cookie_secure = config.cookie_secure;
        let container = Services::from_connection(
            database.get_connection(),
            sessions.clone(),
            notifier,
            config,
        );

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            report_service: container.reports(),
            counseling_service: container.counseling(),
            guidance_service: container.guidance(),
            sessions,
            database,
            cookie_secure,
        }
    }
}
