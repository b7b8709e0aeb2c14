use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Recorded action names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AssignmentCreated,
    AssignmentAccepted,
    AssignmentStarted,
    AssignmentCompleted,
    AssignmentDeclined,
    AssignmentPriorityChanged,
    ReportCreated,
    ReportStatusChanged,
    OperationCreated,
    OperationUpdated,
    OperationMemberRemoved,
    InvitationSent,
    InvitationAccepted,
    InvitationDeclined,
    ApiKeyCreated,
    ApiKeyRevoked,
    DataExported,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AssignmentCreated => "assignment_created",
            AuditAction::AssignmentAccepted => "assignment_accepted",
            AuditAction::AssignmentStarted => "assignment_started",
            AuditAction::AssignmentCompleted => "assignment_completed",
            AuditAction::AssignmentDeclined => "assignment_declined",
            AuditAction::AssignmentPriorityChanged => "assignment_priority_changed",
            AuditAction::ReportCreated => "report_created",
            AuditAction::ReportStatusChanged => "report_status_changed",
            AuditAction::OperationCreated => "operation_created",
            AuditAction::OperationUpdated => "operation_updated",
            AuditAction::OperationMemberRemoved => "operation_member_removed",
            AuditAction::InvitationSent => "invitation_sent",
            AuditAction::InvitationAccepted => "invitation_accepted",
            AuditAction::InvitationDeclined => "invitation_declined",
            AuditAction::ApiKeyCreated => "api_key_created",
            AuditAction::ApiKeyRevoked => "api_key_revoked",
            AuditAction::DataExported => "data_exported",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for audit log entry
#[derive(Debug, Clone, FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub actor_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Data for appending an audit entry
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub organization_id: Option<Uuid>,
    pub actor_id: Uuid,
    pub action: AuditAction,
    pub entity_type: &'static str,
    pub entity_id: Option<Uuid>,
    pub details: serde_json::Value,
}

impl NewAuditLog {
    pub fn new(
        actor_id: Uuid,
        action: AuditAction,
        entity_type: &'static str,
        entity_id: Option<Uuid>,
    ) -> Self {
        Self {
            organization_id: None,
            actor_id,
            action,
            entity_type,
            entity_id,
            details: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn in_organization(mut self, organization_id: Option<Uuid>) -> Self {
        self.organization_id = organization_id;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub organization_id: Option<Uuid>,
    pub actor_id: Option<Uuid>,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
}
