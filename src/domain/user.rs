//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_COUNSELOR, ROLE_GUEST, ROLE_STUDENT, ROLE_TEACHER};
use crate::errors::AppError;

/// Closed set of roles. Every protected operation declares an allow-list of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
    Counselor,
    Admin,
    Guest,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Student,
        UserRole::Teacher,
        UserRole::Counselor,
        UserRole::Admin,
        UserRole::Guest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => ROLE_STUDENT,
            UserRole::Teacher => ROLE_TEACHER,
            UserRole::Counselor => ROLE_COUNSELOR,
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Guest => ROLE_GUEST,
        }
    }

    /// Presentation hint: where a freshly signed-in user of this role lands.
    pub fn landing_route(&self) -> &'static str {
        match self {
            UserRole::Student => "/student/dashboard",
            UserRole::Teacher => "/teacher/dashboard",
            UserRole::Counselor => "/counselor/dashboard",
            UserRole::Admin => "/admin/dashboard",
            UserRole::Guest => "/guest/dashboard",
        }
    }

    /// Roles a visitor may pick when registering without an administrator.
    pub fn is_self_registrable(&self) -> bool {
        matches!(self, UserRole::Student | UserRole::Guest)
    }

    /// Staff roles read every report; others are scoped to their own.
    pub fn is_staff(&self) -> bool {
        matches!(
            self,
            UserRole::Teacher | UserRole::Counselor | UserRole::Admin
        )
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| AppError::validation(format!("Unknown role '{}'", s)))
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Institution-facing identifier (student number, employee code)
    pub user_code: Option<String>,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
    pub year_level: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name shown in the UI and carried by the session
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Data needed to create an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_code: Option<String>,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub year_level: Option<String>,
    pub position: Option<String>,
}

/// Administrator edit of an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub role: Option<UserRole>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_code: Option<String>,
    pub year_level: Option<String>,
    pub position: Option<String>,
    /// `Some(true)` reactivates a deactivated account
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.user_code.is_none()
            && self.year_level.is_none()
            && self.position.is_none()
            && self.is_active.is_none()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub user_code: Option<String>,
    #[schema(example = "jdelacruz@school.edu")]
    pub email: String,
    #[schema(example = "jdelacruz")]
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
    pub year_level: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_code: user.user_code,
            email: user.email,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
            first_name: user.first_name,
            last_name: user.last_name,
            year_level: user.year_level,
            position: user.position,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_closed() {
        assert_eq!("counselor".parse::<UserRole>().unwrap(), UserRole::Counselor);
        assert_eq!(" Teacher ".parse::<UserRole>().unwrap(), UserRole::Teacher);
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_landing_routes() {
        assert_eq!(UserRole::Student.landing_route(), "/student/dashboard");
        assert_eq!(UserRole::Admin.landing_route(), "/admin/dashboard");
    }

    #[test]
    fn test_self_registration_limited() {
        assert!(UserRole::Student.is_self_registrable());
        assert!(UserRole::Guest.is_self_registrable());
        assert!(!UserRole::Counselor.is_self_registrable());
        assert!(!UserRole::Admin.is_self_registrable());
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let now = Utc::now();
        let mut user = User {
            id: Uuid::new_v4(),
            user_code: None,
            email: "a@b.c".into(),
            username: "ana".into(),
            password_hash: String::new(),
            role: UserRole::Student,
            is_active: true,
            first_name: "".into(),
            last_name: " ".into(),
            year_level: None,
            position: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(user.display_name(), "ana");
        user.first_name = "Ana".into();
        user.last_name = "Reyes".into();
        assert_eq!(user.display_name(), "Ana Reyes");
    }
}
