//! Guidance requests filed by guest accounts (parents, visitors).
//!
//! Unlike counseling requests these are not tied to a report. A counselor
//! either resolves or declines each one; both outcomes are final.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceStatus {
    Pending,
    Resolved,
    Declined,
}

impl GuidanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuidanceStatus::Pending => "pending",
            GuidanceStatus::Resolved => "resolved",
            GuidanceStatus::Declined => "declined",
        }
    }

    /// Status after a counselor acts on a request in this status
    pub fn apply(&self, action: GuidanceAction) -> AppResult<GuidanceStatus> {
        match (self, action) {
            (GuidanceStatus::Pending, GuidanceAction::Resolve) => Ok(GuidanceStatus::Resolved),
            (GuidanceStatus::Pending, GuidanceAction::Decline) => Ok(GuidanceStatus::Declined),
            (done, _) => Err(AppError::precondition(format!(
                "Guidance request is already {}",
                done.as_str()
            ))),
        }
    }
}

impl FromStr for GuidanceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(GuidanceStatus::Pending),
            "resolved" => Ok(GuidanceStatus::Resolved),
            "declined" => Ok(GuidanceStatus::Declined),
            other => Err(AppError::validation(format!(
                "Unknown guidance status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceAction {
    Resolve,
    Decline,
}

impl FromStr for GuidanceAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resolve" | "resolved" => Ok(GuidanceAction::Resolve),
            "decline" | "declined" | "reject" => Ok(GuidanceAction::Decline),
            other => Err(AppError::validation(format!("Unknown action '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    #[schema(example = "enrollment")]
    pub request_type: String,
    pub description: String,
    pub status: GuidanceStatus,
    /// Counselor's answer, shown to the requester
    pub response: Option<String>,
    pub handled_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGuidanceRequest {
    pub request_type: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_requests_can_be_closed_once() {
        assert_eq!(
            GuidanceStatus::Pending.apply(GuidanceAction::Resolve).unwrap(),
            GuidanceStatus::Resolved
        );
        assert_eq!(
            GuidanceStatus::Pending.apply(GuidanceAction::Decline).unwrap(),
            GuidanceStatus::Declined
        );
        assert!(matches!(
            GuidanceStatus::Resolved.apply(GuidanceAction::Decline),
            Err(AppError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn test_action_aliases() {
        assert_eq!("Reject".parse::<GuidanceAction>().unwrap(), GuidanceAction::Decline);
        assert!("escalate".parse::<GuidanceAction>().is_err());
    }
}
