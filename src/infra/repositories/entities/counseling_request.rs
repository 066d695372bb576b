//! Counseling request database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::CounselingRequest;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "counseling_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub report_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub preferred_date: Option<Date>,
    pub scheduled_date: Option<Date>,
    pub urgency: String,
    pub status: String,
    pub handled_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for CounselingRequest {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let corrupt = |field: &str| {
            AppError::internal(format!("Counseling request {} has invalid {}", id, field))
        };

        Ok(CounselingRequest {
            id: model.id,
            student_id: model.student_id,
            report_id: model.report_id,
            reason: model.reason,
            preferred_date: model.preferred_date,
            scheduled_date: model.scheduled_date,
            urgency: model.urgency.parse().map_err(|_| corrupt("urgency"))?,
            status: model.status.parse().map_err(|_| corrupt("status"))?,
            handled_by: model.handled_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
