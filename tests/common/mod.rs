//! Shared setup for integration tests: a migrated in-memory SQLite
//! database and the in-process session store.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use casetrack::config::Config;
use casetrack::domain::{NewReport, Priority, SubmissionChannel, User, UserRole};
use casetrack::errors::AppResult;
use casetrack::infra::{Database, MemorySessionStore, NotificationSink, WorkflowEvent};
use casetrack::services::{NewAccount, ServiceContainer, Services};
use uuid::Uuid;

pub const SECRET: &str = "integration-test-session-secret-0123456789";
pub const PASSWORD: &str = "Correct-horse-9";

pub fn test_config() -> Config {
    let mut config = Config::with_session_secret(SECRET).expect("valid secret");
    // One connection keeps the in-memory database alive and shared.
    config.database_url = "sqlite::memory:".to_string();
    config.database_max_connections = 1;
    config.cookie_secure = false;
    config
}

pub async fn test_database(config: &Config) -> Arc<Database> {
    Arc::new(Database::connect(config).await.expect("migrated sqlite"))
}

/// Records every workflow event it is handed
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingNotifier {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().expect("lock").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, event: &WorkflowEvent) -> AppResult<()> {
        self.events.lock().expect("lock").push(event.name());
        Ok(())
    }
}

pub struct Harness {
    pub services: Services,
    pub sessions: Arc<MemorySessionStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub database: Arc<Database>,
}

pub async fn harness() -> Harness {
    let config = test_config();
    let database = test_database(&config).await;
    let sessions = Arc::new(MemorySessionStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let services = Services::from_connection(
        database.get_connection(),
        sessions.clone(),
        notifier.clone(),
        config,
    );

    Harness {
        services,
        sessions,
        notifier,
        database,
    }
}

pub fn account(username: &str, role: UserRole) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        email: format!("{}@school.edu", username),
        role,
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        user_code: None,
        year_level: None,
        position: None,
    }
}

pub async fn create_user(services: &Services, username: &str, role: UserRole) -> User {
    services
        .users()
        .create_user(account(username, role))
        .await
        .expect("user created")
}

pub fn submission(channel: SubmissionChannel, submitted_by: Option<Uuid>) -> NewReport {
    NewReport {
        channel,
        submitted_by,
        student_id: None,
        category: "bullying".to_string(),
        subject: "Name calling at lunch".to_string(),
        description: "A group keeps mocking a classmate in the canteen".to_string(),
        location: Some("Canteen".to_string()),
        incident_date: None,
        persons_involved: None,
        priority: Priority::High,
    }
}
