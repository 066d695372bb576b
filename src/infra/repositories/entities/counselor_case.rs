//! Counselor case database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::CounselorCase;
use crate::errors::AppError;

/// Unique on (report_id, counselor_id); see the review tables migration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "counselor_cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub report_id: Uuid,
    pub counselor_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub counselor_notes: Option<String>,
    pub action_taken: Option<String>,
    pub recommendation: Option<String>,
    pub meeting_date: Option<Date>,
    pub follow_up_date: Option<Date>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ReportId",
        to = "super::report::Column::Id"
    )]
    Report,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for CounselorCase {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(|_| {
            AppError::internal(format!("Counselor case {} has invalid status", model.id))
        })?;

        Ok(CounselorCase {
            id: model.id,
            report_id: model.report_id,
            counselor_id: model.counselor_id,
            summary: model.summary,
            counselor_notes: model.counselor_notes,
            action_taken: model.action_taken,
            recommendation: model.recommendation,
            meeting_date: model.meeting_date,
            follow_up_date: model.follow_up_date,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
