//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_code: Option<String>,
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: String,
    /// Soft delete flag (false = deactivated, never hard-deleted)
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
    pub year_level: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: UserRole = model
            .role
            .parse()
            .map_err(|_| AppError::internal(format!("User {} has unknown role", model.id)))?;

        Ok(User {
            id: model.id,
            user_code: model.user_code,
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
            role,
            is_active: model.is_active,
            first_name: model.first_name,
            last_name: model.last_name,
            year_level: model.year_level,
            position: model.position,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
