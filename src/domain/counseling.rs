//! Counseling requests and their resolution rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Priority;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rescheduled,
    Rejected,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rescheduled => "rescheduled",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
        }
    }

    /// Still awaiting a session or its outcome
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            RequestStatus::Pending | RequestStatus::Approved | RequestStatus::Rescheduled
        )
    }

    /// Status after applying `action`, or why the action is not allowed.
    ///
    /// Completing an already completed request is a no-op and yields
    /// `Completed` again.
    pub fn apply(&self, action: RequestAction) -> AppResult<RequestStatus> {
        match (self, action) {
            (RequestStatus::Completed, RequestAction::Complete) => Ok(RequestStatus::Completed),
            (status, _) if !status.is_open() => Err(AppError::precondition(format!(
                "Counseling request is already {}",
                status.as_str()
            ))),
            (_, RequestAction::Approve) => Ok(RequestStatus::Approved),
            (_, RequestAction::Reschedule) => Ok(RequestStatus::Rescheduled),
            (_, RequestAction::Reject) => Ok(RequestStatus::Rejected),
            (_, RequestAction::Complete) => Ok(RequestStatus::Completed),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rescheduled" => Ok(RequestStatus::Rescheduled),
            "rejected" => Ok(RequestStatus::Rejected),
            "completed" => Ok(RequestStatus::Completed),
            other => Err(AppError::validation(format!(
                "Unknown request status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counselor decision on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Approve,
    Reschedule,
    Reject,
    Complete,
}

impl RequestAction {
    pub fn requires_schedule(&self) -> bool {
        matches!(self, RequestAction::Approve | RequestAction::Reschedule)
    }
}

impl FromStr for RequestAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(RequestAction::Approve),
            "reschedule" | "rescheduled" => Ok(RequestAction::Reschedule),
            "reject" | "rejected" => Ok(RequestAction::Reject),
            "complete" | "completed" => Ok(RequestAction::Complete),
            other => Err(AppError::validation(format!("Unknown action '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounselingRequest {
    pub id: Uuid,
    /// Requesting student
    pub student_id: Uuid,
    /// Report the request was spawned from
    pub report_id: Option<Uuid>,
    pub reason: String,
    pub preferred_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub urgency: Priority,
    pub status: RequestStatus,
    /// Counselor who last acted on the request
    pub handled_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCounselingRequest {
    pub report_id: Uuid,
    pub reason: String,
    pub preferred_date: Option<NaiveDate>,
    pub urgency: Priority,
}
