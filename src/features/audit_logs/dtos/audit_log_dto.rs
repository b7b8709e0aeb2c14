use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::audit_logs::models::AuditLog;
use crate::shared::types::{default_page, default_page_size};

/// Response DTO for audit log entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLogResponseDto {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub actor_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogResponseDto {
    fn from(l: AuditLog) -> Self {
        Self {
            id: l.id,
            organization_id: l.organization_id,
            actor_id: l.actor_id,
            action: l.action,
            entity_type: l.entity_type,
            entity_id: l.entity_id,
            details: l.details,
            created_at: l.created_at,
        }
    }
}

/// Query parameters for listing audit logs
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AuditLogQueryParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Filter by acting user
    pub actor_id: Option<Uuid>,
    /// Filter by entity type (e.g. "assignment", "operation")
    pub entity_type: Option<String>,
    /// Filter by entity id
    pub entity_id: Option<Uuid>,
    /// Restrict to an organization (super admin only; others are pinned to their own)
    pub organization_id: Option<Uuid>,
}
