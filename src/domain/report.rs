//! Report aggregate: the central workflow entity.
//!
//! A report moves along two axes. `Stage` records which role currently owns
//! it; `ReportStatus` is the human-facing progress label. They are updated
//! together by workflow transitions but never derived from each other.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::TrackingCode;
use crate::config::{
    ANONYMOUS_SUBMITTER, ROLE_STUDENT, ROLE_TEACHER, STAGE_COUNSELOR_REVIEW,
    STAGE_TEACHER_REVIEW, STATUS_SETTLED, STATUS_SUBMITTED, STATUS_UNDER_REVIEW,
};
use crate::errors::AppError;

/// Pipeline position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Stage {
    #[serde(rename = "Teacher Review")]
    TeacherReview,
    #[serde(rename = "Counselor Review")]
    CounselorReview,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::TeacherReview => STAGE_TEACHER_REVIEW,
            Stage::CounselorReview => STAGE_COUNSELOR_REVIEW,
        }
    }
}

impl FromStr for Stage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(STAGE_TEACHER_REVIEW) || s.eq_ignore_ascii_case("teacher") {
            Ok(Stage::TeacherReview)
        } else if s.eq_ignore_ascii_case(STAGE_COUNSELOR_REVIEW)
            || s.eq_ignore_ascii_case("counselor")
        {
            Ok(Stage::CounselorReview)
        } else {
            Err(AppError::validation(format!("Unknown stage '{}'", s)))
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-facing progress label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    Settled,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Submitted => STATUS_SUBMITTED,
            ReportStatus::UnderReview => STATUS_UNDER_REVIEW,
            ReportStatus::Settled => STATUS_SETTLED,
        }
    }
}

impl FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(STATUS_SUBMITTED) {
            Ok(ReportStatus::Submitted)
        } else if s.eq_ignore_ascii_case(STATUS_UNDER_REVIEW) {
            Ok(ReportStatus::UnderReview)
        } else if s.eq_ignore_ascii_case(STATUS_SETTLED) || s.eq_ignore_ascii_case("Resolved") {
            Ok(ReportStatus::Settled)
        } else {
            Err(AppError::validation(format!("Unknown report status '{}'", s)))
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report priority, also used as counseling request urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" | "medium" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" | "critical" => Ok(Priority::Urgent),
            other => Err(AppError::validation(format!("Unknown priority '{}'", other))),
        }
    }
}

/// Channel a report arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionChannel {
    Student,
    Teacher,
    Anonymous,
}

impl SubmissionChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionChannel::Student => ROLE_STUDENT,
            SubmissionChannel::Teacher => ROLE_TEACHER,
            SubmissionChannel::Anonymous => ANONYMOUS_SUBMITTER,
        }
    }
}

impl FromStr for SubmissionChannel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_STUDENT => Ok(SubmissionChannel::Student),
            ROLE_TEACHER => Ok(SubmissionChannel::Teacher),
            ANONYMOUS_SUBMITTER => Ok(SubmissionChannel::Anonymous),
            other => Err(AppError::internal(format!(
                "Unknown submission channel '{}'",
                other
            ))),
        }
    }
}

/// Report domain entity
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    #[schema(value_type = String, example = "QK482913")]
    pub tracking_code: TrackingCode,
    pub channel: SubmissionChannel,
    /// Submitting user; `None` for the anonymous channel
    pub submitted_by: Option<Uuid>,
    /// Student the incident concerns, when named by a teacher
    pub student_id: Option<Uuid>,
    pub category: String,
    pub subject: String,
    pub description: String,
    pub location: Option<String>,
    pub incident_date: Option<NaiveDate>,
    pub persons_involved: Option<String>,
    pub priority: Priority,
    pub stage: Stage,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Whether the given user filed this report or is the student it names
    pub fn concerns(&self, user_id: Uuid) -> bool {
        self.submitted_by == Some(user_id) || self.student_id == Some(user_id)
    }
}

/// Validated submission, ready for the lifecycle engine
#[derive(Debug, Clone)]
pub struct NewReport {
    pub channel: SubmissionChannel,
    pub submitted_by: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub category: String,
    pub subject: String,
    pub description: String,
    pub location: Option<String>,
    pub incident_date: Option<NaiveDate>,
    pub persons_involved: Option<String>,
    pub priority: Priority,
}

/// What anonymous tracking reveals. Never includes submitter identity.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    #[schema(value_type = String, example = "QK482913")]
    pub tracking_code: TrackingCode,
    pub category: String,
    pub subject: String,
    pub stage: Stage,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportSnapshot {
    fn from(report: Report) -> Self {
        Self {
            tracking_code: report.tracking_code,
            category: report.category,
            subject: report.subject,
            stage: report.stage,
            status: report.status,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

/// Which reports a caller may read, resolved once from the caller's role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Concerning(Uuid),
}

impl ReportScope {
    pub fn permits(&self, report: &Report) -> bool {
        match self {
            ReportScope::All => true,
            ReportScope::Concerning(user_id) => report.concerns(*user_id),
        }
    }
}

/// List filter for report queries
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub stage: Option<Stage>,
    pub submitted_by: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels_roundtrip() {
        assert_eq!("Teacher Review".parse::<Stage>().unwrap(), Stage::TeacherReview);
        assert_eq!("counselor review".parse::<Stage>().unwrap(), Stage::CounselorReview);
        assert_eq!(Stage::CounselorReview.to_string(), "Counselor Review");
        assert!("Principal Review".parse::<Stage>().is_err());
    }

    #[test]
    fn test_status_accepts_resolved_alias() {
        assert_eq!("Resolved".parse::<ReportStatus>().unwrap(), ReportStatus::Settled);
        assert_eq!(
            serde_json::to_string(&ReportStatus::UnderReview).unwrap(),
            "\"Under Review\""
        );
    }

    #[test]
    fn test_priority_defaults_to_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
        assert!("whenever".parse::<Priority>().is_err());
    }

    #[test]
    fn test_scope_limits_to_own_reports() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            tracking_code: TrackingCode::parse("AB123456").unwrap(),
            channel: SubmissionChannel::Student,
            submitted_by: Some(owner),
            student_id: None,
            category: "bullying".into(),
            subject: "Hallway".into(),
            description: "...".into(),
            location: None,
            incident_date: None,
            persons_involved: None,
            priority: Priority::Normal,
            stage: Stage::TeacherReview,
            status: ReportStatus::Submitted,
            created_at: now,
            updated_at: now,
        };

        assert!(ReportScope::All.permits(&report));
        assert!(ReportScope::Concerning(owner).permits(&report));
        assert!(!ReportScope::Concerning(Uuid::new_v4()).permits(&report));
    }
}
