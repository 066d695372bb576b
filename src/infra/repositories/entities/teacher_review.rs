//! Teacher review database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{ReviewDisposition, TeacherReview};

/// Unique on (report_id, teacher_id); see the review tables migration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub report_id: Uuid,
    pub teacher_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub action_taken: Option<String>,
    pub recommendation: Option<String>,
    pub disposition: String,
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

impl From<Model> for TeacherReview {
    fn from(model: Model) -> Self {
        TeacherReview {
            id: model.id,
            report_id: model.report_id,
            teacher_id: model.teacher_id,
            notes: model.notes,
            action_taken: model.action_taken,
            recommendation: model.recommendation,
            disposition: ReviewDisposition::from(model.disposition.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
