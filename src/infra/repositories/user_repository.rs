//! User repository: credential store reads and account provisioning.
//!
//! Accounts are never hard-deleted; deactivation clears `is_active` and
//! the login lookup only sees active rows.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserRole, UserUpdate};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, active or not
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find an active user by exact username
    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Create a new user
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Mark a user inactive
    async fn deactivate(&self, id: Uuid) -> AppResult<User>;

    /// Apply an administrator edit, including reactivation
    async fn update(&self, id: Uuid, changes: UserUpdate) -> AppResult<User>;

    /// List users, newest first, optionally restricted to one role
    async fn list(
        &self,
        role: Option<UserRole>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_user(&self.db, id).await
    }

    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        result.map(User::try_from).transpose()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        insert_user(&self.db, new_user).await
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<User> {
        deactivate_user(&self.db, id).await
    }

    async fn update(&self, id: Uuid, changes: UserUpdate) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        if let Some(role) = changes.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(user_code) = changes.user_code {
            active.user_code = Set(Some(user_code).filter(|c| !c.trim().is_empty()));
        }
        if let Some(year_level) = changes.year_level {
            active.year_level = Set(Some(year_level));
        }
        if let Some(position) = changes.position {
            active.position = Set(Some(position));
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::conflict("User code"),
            other => other,
        })?;
        User::try_from(model)
    }

    async fn list(
        &self,
        role: Option<UserRole>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find().order_by_desc(user::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        let users = models
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((users, total))
    }
}

async fn find_user<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<User>> {
    UserEntity::find_by_id(id)
        .one(conn)
        .await?
        .map(User::try_from)
        .transpose()
}

async fn insert_user<C: ConnectionTrait>(conn: &C, new_user: NewUser) -> AppResult<User> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_code: Set(new_user.user_code),
        email: Set(new_user.email),
        username: Set(new_user.username),
        password_hash: Set(new_user.password_hash),
        role: Set(new_user.role.as_str().to_string()),
        is_active: Set(true),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        year_level: Set(new_user.year_level),
        position: Set(new_user.position),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(conn).await.map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::conflict("Username or user code"),
        other => other,
    })?;
    User::try_from(model)
}

async fn deactivate_user<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<User> {
    let model = UserEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = model.into();
    active.is_active = Set(false);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(conn).await?;
    User::try_from(model)
}
