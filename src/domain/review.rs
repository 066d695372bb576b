//! Review artifacts produced by the teacher and counselor stages.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    CASE_CONFIRMED, CASE_IN_REVIEW, CASE_SETTLED, DISPOSITION_FORWARDED, DISPOSITION_REVIEWED,
};
use crate::errors::AppError;

/// Outcome a teacher records for a report.
///
/// Only `ForwardedToCounselor` moves the report to the next stage; any other
/// label is kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDisposition {
    Reviewed,
    ForwardedToCounselor,
    Other(String),
}

impl ReviewDisposition {
    pub fn as_str(&self) -> &str {
        match self {
            ReviewDisposition::Reviewed => DISPOSITION_REVIEWED,
            ReviewDisposition::ForwardedToCounselor => DISPOSITION_FORWARDED,
            ReviewDisposition::Other(label) => label,
        }
    }

    pub fn forwards(&self) -> bool {
        matches!(self, ReviewDisposition::ForwardedToCounselor)
    }
}

impl Default for ReviewDisposition {
    fn default() -> Self {
        ReviewDisposition::Reviewed
    }
}

impl From<&str> for ReviewDisposition {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(DISPOSITION_REVIEWED) {
            ReviewDisposition::Reviewed
        } else if s.eq_ignore_ascii_case(DISPOSITION_FORWARDED) {
            ReviewDisposition::ForwardedToCounselor
        } else {
            ReviewDisposition::Other(s.to_string())
        }
    }
}

impl Serialize for ReviewDisposition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A teacher's review of a report. One live row per (report, teacher).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherReview {
    pub id: Uuid,
    pub report_id: Uuid,
    pub teacher_id: Uuid,
    pub notes: String,
    pub action_taken: Option<String>,
    pub recommendation: Option<String>,
    #[schema(value_type = String, example = "Forwarded to Counselor")]
    pub disposition: ReviewDisposition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct TeacherReviewInput {
    pub notes: String,
    pub action_taken: Option<String>,
    pub recommendation: Option<String>,
    pub disposition: ReviewDisposition,
}

/// Counselor case status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CaseStatus {
    #[default]
    #[serde(rename = "In Review")]
    InReview,
    Confirmed,
    Settled,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::InReview => CASE_IN_REVIEW,
            CaseStatus::Confirmed => CASE_CONFIRMED,
            CaseStatus::Settled => CASE_SETTLED,
        }
    }
}

impl FromStr for CaseStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(CASE_IN_REVIEW) {
            Ok(CaseStatus::InReview)
        } else if s.eq_ignore_ascii_case(CASE_CONFIRMED) {
            Ok(CaseStatus::Confirmed)
        } else if s.eq_ignore_ascii_case(CASE_SETTLED) || s.eq_ignore_ascii_case("Resolved") {
            Ok(CaseStatus::Settled)
        } else {
            Err(AppError::validation(format!("Unknown case status '{}'", s)))
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A counselor's case record for a report. One live row per (report, counselor).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounselorCase {
    pub id: Uuid,
    pub report_id: Uuid,
    pub counselor_id: Uuid,
    pub summary: Option<String>,
    pub counselor_notes: Option<String>,
    pub action_taken: Option<String>,
    pub recommendation: Option<String>,
    pub meeting_date: Option<NaiveDate>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CounselorCaseInput {
    pub summary: Option<String>,
    pub counselor_notes: Option<String>,
    pub action_taken: Option<String>,
    pub recommendation: Option<String>,
    pub meeting_date: Option<NaiveDate>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: CaseStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_forward_detection() {
        assert!(ReviewDisposition::from("Forwarded to Counselor").forwards());
        assert!(ReviewDisposition::from("forwarded to counselor").forwards());
        assert!(!ReviewDisposition::from("Reviewed").forwards());
        assert!(!ReviewDisposition::from("Parent contacted").forwards());
    }

    #[test]
    fn test_disposition_defaults_and_keeps_labels() {
        assert_eq!(ReviewDisposition::from(""), ReviewDisposition::Reviewed);
        assert_eq!(
            ReviewDisposition::from("Parent contacted").as_str(),
            "Parent contacted"
        );
    }

    #[test]
    fn test_case_status_parse() {
        assert_eq!("".parse::<CaseStatus>().unwrap(), CaseStatus::InReview);
        assert_eq!("confirmed".parse::<CaseStatus>().unwrap(), CaseStatus::Confirmed);
        assert_eq!("Resolved".parse::<CaseStatus>().unwrap(), CaseStatus::Settled);
        assert!("Escalated".parse::<CaseStatus>().is_err());
    }
}
