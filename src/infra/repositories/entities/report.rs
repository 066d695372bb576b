//! Report database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Report, TrackingCode};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Stored upper-case; lookups normalize before comparing
    #[sea_orm(unique)]
    pub tracking_code: String,
    pub channel: String,
    pub submitted_by: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub category: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: Option<String>,
    pub incident_date: Option<Date>,
    pub persons_involved: Option<String>,
    pub priority: String,
    pub stage: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teacher_review::Entity")]
    TeacherReviews,
    #[sea_orm(has_many = "super::counselor_case::Entity")]
    CounselorCases,
}

impl Related<super::teacher_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherReviews.def()
    }
}

impl Related<super::counselor_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CounselorCases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Report {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let corrupt = |field: &str| AppError::internal(format!("Report {} has invalid {}", id, field));

        Ok(Report {
            id: model.id,
            tracking_code: TrackingCode::parse(&model.tracking_code)
                .map_err(|_| corrupt("tracking_code"))?,
            channel: model.channel.parse().map_err(|_| corrupt("channel"))?,
            submitted_by: model.submitted_by,
            student_id: model.student_id,
            category: model.category,
            subject: model.subject,
            description: model.description,
            location: model.location,
            incident_date: model.incident_date,
            persons_involved: model.persons_involved,
            priority: model.priority.parse().map_err(|_| corrupt("priority"))?,
            stage: model.stage.parse().map_err(|_| corrupt("stage"))?,
            status: model.status.parse().map_err(|_| corrupt("status"))?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
