//! Guidance request database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::GuidanceRequest;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guidance_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub requester_id: Uuid,
    pub request_type: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub response: Option<String>,
    pub handled_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for GuidanceRequest {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(|_| {
            AppError::internal(format!("Guidance request {} has invalid status", model.id))
        })?;

        Ok(GuidanceRequest {
            id: model.id,
            requester_id: model.requester_id,
            request_type: model.request_type,
            description: model.description,
            status,
            response: model.response,
            handled_by: model.handled_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
