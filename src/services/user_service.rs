//! User service - account provisioning and administration.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewUser, Password, User, UserRole, UserUpdate};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Account details before the password is hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub user_code: Option<String>,
    pub year_level: Option<String>,
    pub position: Option<String>,
}

impl NewAccount {
    /// Hash the password and produce a storable record.
    pub fn into_new_user(self) -> AppResult<NewUser> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }

        let password_hash = Password::new(&self.password)?.into_string();
        Ok(NewUser {
            user_code: self.user_code.filter(|c| !c.trim().is_empty()),
            email: self.email,
            username,
            password_hash,
            role: self.role,
            first_name: self.first_name,
            last_name: self.last_name,
            year_level: self.year_level,
            position: self.position,
        })
    }
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Provision an account of any role
    async fn create_user(&self, account: NewAccount) -> AppResult<User>;

    async fn list_users(
        &self,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    /// Deactivate an account. Admins cannot deactivate themselves.
    async fn deactivate_user(&self, id: Uuid, acting_admin: Uuid) -> AppResult<User>;

    /// Edit an account's role, profile or active flag.
    ///
    /// Admins cannot change their own role or deactivate themselves.
    async fn update_user(&self, id: Uuid, changes: UserUpdate, acting_admin: Uuid)
        -> AppResult<User>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_user(&self, account: NewAccount) -> AppResult<User> {
        let user = self.uow.users().create(account.into_new_user()?).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User provisioned");
        Ok(user)
    }

    async fn list_users(
        &self,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        self.uow.users().list(role, &params).await
    }

    async fn deactivate_user(&self, id: Uuid, acting_admin: Uuid) -> AppResult<User> {
        if id == acting_admin {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }

        let user = self.uow.users().deactivate(id).await?;
        tracing::info!(user_id = %id, by = %acting_admin, "User deactivated");
        Ok(user)
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserUpdate,
        acting_admin: Uuid,
    ) -> AppResult<User> {
        if changes.is_empty() {
            return Err(AppError::validation("No changes supplied"));
        }
        if id == acting_admin {
            if changes.is_active == Some(false) {
                return Err(AppError::validation("You cannot deactivate your own account"));
            }
            if changes.role.is_some_and(|role| role != UserRole::Admin) {
                return Err(AppError::validation("You cannot change your own role"));
            }
        }

        let user = self.uow.users().update(id, changes).await?;
        tracing::info!(
            user_id = %id,
            by = %acting_admin,
            role = %user.role,
            is_active = user.is_active,
            "User updated"
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::{sample_user, TestUnitOfWork};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        assert!(matches!(
            service.get_user(Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|new_user| {
                new_user.password_hash != "Counselor-pass-1"
                    && Password::from_hash(new_user.password_hash.as_str())
                        .verify("Counselor-pass-1")
            })
            .returning(|new_user| {
                let mut user = sample_user(new_user.role);
                user.username = new_user.username;
                Ok(user)
            });

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let user = service
            .create_user(NewAccount {
                username: " gcounselor ".into(),
                password: "Counselor-pass-1".into(),
                email: "g@school.edu".into(),
                role: UserRole::Counselor,
                first_name: "Grace".into(),
                last_name: "Santos".into(),
                user_code: None,
                year_level: None,
                position: Some("Guidance Counselor".into()),
            })
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Counselor);
        assert_eq!(user.username, "gcounselor");
    }

    #[tokio::test]
    async fn test_admin_cannot_deactivate_self() {
        let admin = Uuid::new_v4();
        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(
            MockUserRepository::new(),
        )));

        assert!(matches!(
            service.deactivate_user(admin, admin).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_deactivate_user() {
        let target = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_deactivate()
            .with(eq(target))
            .times(1)
            .returning(|id| {
                let mut user = sample_user(UserRole::Student);
                user.id = id;
                user.is_active = false;
                Ok(user)
            });

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let user = service.deactivate_user(target, Uuid::new_v4()).await.unwrap();
        assert!(!user.is_active);
    }

    #[tokio::test]
    async fn test_admin_cannot_demote_self() {
        let admin = Uuid::new_v4();
        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(
            MockUserRepository::new(),
        )));

        let changes = UserUpdate {
            role: Some(UserRole::Teacher),
            ..Default::default()
        };
        assert!(matches!(
            service.update_user(admin, changes, admin).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_update_rejected() {
        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(
            MockUserRepository::new(),
        )));
        assert!(matches!(
            service
                .update_user(Uuid::new_v4(), UserUpdate::default(), Uuid::new_v4())
                .await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_reactivation_reaches_repository() {
        let target = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .withf(move |id, changes| *id == target && changes.is_active == Some(true))
            .times(1)
            .returning(|id, _| {
                let mut user = sample_user(UserRole::Student);
                user.id = id;
                Ok(user)
            });

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let changes = UserUpdate {
            is_active: Some(true),
            ..Default::default()
        };
        let user = service.update_user(target, changes, Uuid::new_v4()).await.unwrap();
        assert!(user.is_active);
    }
}
