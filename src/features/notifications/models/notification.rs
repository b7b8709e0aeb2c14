use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AssignmentCreated,
    AssignmentStatusChanged,
    AssignmentUpdated,
    ReportStatusChanged,
    OperationStatusChanged,
    InvitationReceived,
    InvitationResponded,
}

impl NotificationKind {
    /// SSE `event:` name
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AssignmentCreated => "assignment.created",
            NotificationKind::AssignmentStatusChanged => "assignment.status_changed",
            NotificationKind::AssignmentUpdated => "assignment.updated",
            NotificationKind::ReportStatusChanged => "report.status_changed",
            NotificationKind::OperationStatusChanged => "operation.status_changed",
            NotificationKind::InvitationReceived => "invitation.received",
            NotificationKind::InvitationResponded => "invitation.responded",
        }
    }
}

/// A change pushed to connected clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationEvent {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub organization_id: Option<Uuid>,
    pub entity_id: Uuid,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    /// Users addressed directly
    #[serde(skip)]
    pub recipients: Vec<Uuid>,
    /// Also deliver to coordinators of `organization_id`
    #[serde(skip)]
    pub notify_coordinators: bool,
}

impl NotificationEvent {
    pub fn new(
        kind: NotificationKind,
        organization_id: Option<Uuid>,
        entity_id: Uuid,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            organization_id,
            entity_id,
            payload,
            created_at: Utc::now(),
            recipients: Vec::new(),
            notify_coordinators: false,
        }
    }

    pub fn to_user(mut self, user_id: Uuid) -> Self {
        if !self.recipients.contains(&user_id) {
            self.recipients.push(user_id);
        }
        self
    }

    pub fn to_coordinators(mut self) -> Self {
        self.notify_coordinators = true;
        self
    }

    pub fn is_visible_to(&self, user: &AuthenticatedUser) -> bool {
        if self.recipients.contains(&user.user_id) {
            return true;
        }
        if !self.notify_coordinators || !user.has_coordinator_access() {
            return false;
        }
        match self.organization_id {
            Some(org) => user.can_access_organization(org),
            None => user.is_super_admin(),
        }
    }
}
