use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Assignment status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "assignment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Declined,
}

impl AssignmentStatus {
    pub const ALL: [AssignmentStatus; 5] = [
        AssignmentStatus::Pending,
        AssignmentStatus::Accepted,
        AssignmentStatus::InProgress,
        AssignmentStatus::Completed,
        AssignmentStatus::Declined,
    ];

    /// Completed and declined assignments are kept for audit but never change again
    pub fn is_terminal(self) -> bool {
        matches!(self, AssignmentStatus::Completed | AssignmentStatus::Declined)
    }

    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Pending => write!(f, "pending"),
            AssignmentStatus::Accepted => write!(f, "accepted"),
            AssignmentStatus::InProgress => write!(f, "in_progress"),
            AssignmentStatus::Completed => write!(f, "completed"),
            AssignmentStatus::Declined => write!(f, "declined"),
        }
    }
}

/// Assignment priority enum matching database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "assignment_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl std::fmt::Display for AssignmentPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentPriority::Low => write!(f, "low"),
            AssignmentPriority::Normal => write!(f, "normal"),
            AssignmentPriority::High => write!(f, "high"),
            AssignmentPriority::Urgent => write!(f, "urgent"),
        }
    }
}

/// Database model for assignment
#[derive(Debug, Clone, FromRow)]
pub struct Assignment {
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
}

/// Data for creating a new assignment
#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub organization_id: Uuid,
    pub report_id: Uuid,
    pub responder_id: Uuid,
    pub operation_id: Option<Uuid>,
    pub priority: AssignmentPriority,
    pub notes: Option<String>,
    pub assigned_by: Uuid,
}

/// Filters for assignment listings; `None` means "any"
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub organization_id: Option<Uuid>,
    pub responder_id: Option<Uuid>,
    pub report_id: Option<Uuid>,
    pub operation_id: Option<Uuid>,
    pub status: Option<AssignmentStatus>,
}
