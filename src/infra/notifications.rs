//! Outbound notifications for workflow events.
//!
//! Delivery is best effort and happens after the triggering transaction
//! commits. A failed notification is logged and never undoes the workflow
//! change that caused it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CounselingRequest, CounselorCase, GuidanceRequest, Report};
use crate::errors::AppResult;

/// Workflow events worth telling someone about
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    ReportSubmitted { report: Report },
    ForwardedToCounselor { report: Report, teacher_id: Uuid },
    CaseConfirmed { case: CounselorCase },
    CounselingRequested { request: CounselingRequest },
    CounselingResolved { request: CounselingRequest },
    GuidanceRequested { request: GuidanceRequest },
    GuidanceResolved { request: GuidanceRequest },
}

impl WorkflowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::ReportSubmitted { .. } => "report_submitted",
            WorkflowEvent::ForwardedToCounselor { .. } => "forwarded_to_counselor",
            WorkflowEvent::CaseConfirmed { .. } => "case_confirmed",
            WorkflowEvent::CounselingRequested { .. } => "counseling_requested",
            WorkflowEvent::CounselingResolved { .. } => "counseling_resolved",
            WorkflowEvent::GuidanceRequested { .. } => "guidance_requested",
            WorkflowEvent::GuidanceResolved { .. } => "guidance_resolved",
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: &WorkflowEvent) -> AppResult<()>;
}

/// Default sink: structured log lines only.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationSink for TracingNotifier {
    async fn notify(&self, event: &WorkflowEvent) -> AppResult<()> {
        match event {
            WorkflowEvent::ReportSubmitted { report } => tracing::info!(
                event = event.name(),
                report_id = %report.id,
                tracking_code = %report.tracking_code,
                channel = report.channel.as_str(),
                "Report submitted"
            ),
            WorkflowEvent::ForwardedToCounselor { report, teacher_id } => tracing::info!(
                event = event.name(),
                report_id = %report.id,
                teacher_id = %teacher_id,
                "Report forwarded to counselors"
            ),
            WorkflowEvent::CaseConfirmed { case } => tracing::info!(
                event = event.name(),
                report_id = %case.report_id,
                counselor_id = %case.counselor_id,
                "Counselor case confirmed"
            ),
            WorkflowEvent::CounselingRequested { request } => tracing::info!(
                event = event.name(),
                request_id = %request.id,
                student_id = %request.student_id,
                "Counseling requested"
            ),
            WorkflowEvent::CounselingResolved { request } => tracing::info!(
                event = event.name(),
                request_id = %request.id,
                status = request.status.as_str(),
                "Counseling request resolved"
            ),
            WorkflowEvent::GuidanceRequested { request } => tracing::info!(
                event = event.name(),
                request_id = %request.id,
                request_type = %request.request_type,
                "Guidance requested"
            ),
            WorkflowEvent::GuidanceResolved { request } => tracing::info!(
                event = event.name(),
                request_id = %request.id,
                status = request.status.as_str(),
                "Guidance request closed"
            ),
        }
        Ok(())
    }
}

/// Deliver an event, logging instead of propagating failures.
pub async fn dispatch(sink: &dyn NotificationSink, event: WorkflowEvent) {
    if let Err(e) = sink.notify(&event).await {
        tracing::warn!(event = event.name(), "Notification delivery failed: {}", e);
    }
}
