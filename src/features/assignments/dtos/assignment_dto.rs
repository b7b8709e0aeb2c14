use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::assignments::models::{
    Assignment, AssignmentAction, AssignmentPriority, AssignmentStatus, TransitionPolicy,
};
use crate::shared::types::{default_page, default_page_size};

/// Response DTO for assignment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentResponseDto {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub report_id: Uuid,
    pub responder_id: Uuid,
    pub operation_id: Option<Uuid>,
    pub status: AssignmentStatus,
    pub priority: AssignmentPriority,
    pub notes: Option<String>,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub decline_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Actions the assignee may perform next
    pub available_actions: Vec<AssignmentAction>,
}

impl AssignmentResponseDto {
    pub fn from_model(a: Assignment, policy: TransitionPolicy) -> Self {
        Self {
            available_actions: a.status.available_actions(policy),
            id: a.id,
            organization_id: a.organization_id,
            report_id: a.report_id,
            responder_id: a.responder_id,
            operation_id: a.operation_id,
            status: a.status,
            priority: a.priority,
            notes: a.notes,
            assigned_by: a.assigned_by,
            assigned_at: a.assigned_at,
            accepted_at: a.accepted_at,
            started_at: a.started_at,
            completed_at: a.completed_at,
            declined_at: a.declined_at,
            decline_reason: a.decline_reason,
            updated_at: a.updated_at,
        }
    }
}

/// Request DTO for assigning a responder to a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentDto {
    pub report_id: Uuid,
    pub responder_id: Uuid,
    pub operation_id: Option<Uuid>,
    pub priority: Option<AssignmentPriority>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Request DTO for declining an assignment
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeclineAssignmentDto {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Request DTO for replacing assignment notes (null clears them)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentNotesDto {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Request DTO for changing assignment priority
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentPriorityDto {
    pub priority: AssignmentPriority,
}

/// Query parameters for the coordinator assignment listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AssignmentQueryParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub status: Option<AssignmentStatus>,
    pub responder_id: Option<Uuid>,
    pub report_id: Option<Uuid>,
    pub operation_id: Option<Uuid>,
    /// Restrict to an organization (super admin only; others are pinned to their own)
    pub organization_id: Option<Uuid>,
}

/// Query parameters for the responder's own assignments
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct MyAssignmentsQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub status: Option<AssignmentStatus>,
}

/// Query parameters for assignment statistics
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AssignmentStatsQuery {
    /// Super admin only; others are pinned to their own organization
    pub organization_id: Option<Uuid>,
}

/// Assignment counts per status
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AssignmentStatsDto {
    pub pending: i64,
    pub accepted: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub declined: i64,
    pub total: i64,
}

impl AssignmentStatsDto {
    pub fn from_counts(counts: &[(AssignmentStatus, i64)]) -> Self {
        let mut stats = Self::default();
        for &(status, count) in counts {
            let slot = match status {
                AssignmentStatus::Pending => &mut stats.pending,
                AssignmentStatus::Accepted => &mut stats.accepted,
                AssignmentStatus::InProgress => &mut stats.in_progress,
                AssignmentStatus::Completed => &mut stats.completed,
                AssignmentStatus::Declined => &mut stats.declined,
            };
            *slot += count;
            stats.total += count;
        }
        stats
    }
}
