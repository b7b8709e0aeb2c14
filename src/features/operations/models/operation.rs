use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Operation status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "operation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Planned,
    Active,
    Suspended,
    Closed,
}

impl OperationStatus {
    /// planned -> active -> suspended <-> active -> closed
    pub fn can_transition_to(self, next: OperationStatus) -> bool {
        use OperationStatus::*;
        matches!(
            (self, next),
            (Planned, Active) | (Active, Suspended) | (Suspended, Active) | (Active, Closed)
        )
    }

    pub fn is_closed(self) -> bool {
        self == OperationStatus::Closed
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Planned => write!(f, "planned"),
            OperationStatus::Active => write!(f, "active"),
            OperationStatus::Suspended => write!(f, "suspended"),
            OperationStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Role of a user inside an operation team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Lead,
    #[default]
    Member,
}

/// Invitation status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Revoked,
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationStatus::Pending => write!(f, "pending"),
            InvitationStatus::Accepted => write!(f, "accepted"),
            InvitationStatus::Declined => write!(f, "declined"),
            InvitationStatus::Revoked => write!(f, "revoked"),
        }
    }
}

/// Database model for operation
#[derive(Debug, Clone, FromRow)]
pub struct Operation {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: OperationStatus,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub radius_km: Decimal,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Timestamps to write when an operation changes status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusStamps {
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Operation {
    /// `started_at` is set on the first activation only; `ended_at` on close
    pub fn stamps_for(&self, next: OperationStatus, now: DateTime<Utc>) -> StatusStamps {
        StatusStamps {
            started_at: match (self.started_at, next) {
                (None, OperationStatus::Active) => Some(now),
                (existing, _) => existing,
            },
            ended_at: if next == OperationStatus::Closed {
                Some(now)
            } else {
                self.ended_at
            },
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OperationMember {
    pub operation_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct OperationInvitation {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub invitee_id: Uuid,
    pub invited_by: Uuid,
    pub role: MemberRole,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// One situation report per author per day
#[derive(Debug, Clone, FromRow)]
pub struct DailyLog {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub author_id: Uuid,
    pub log_date: NaiveDate,
    pub summary: String,
    pub personnel_count: i32,
    pub incidents_handled: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new operation; the creator joins the team as lead
#[derive(Debug, Clone)]
pub struct CreateOperation {
    pub organization_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub radius_km: Decimal,
    pub created_by: Uuid,
}

/// Values written by an update; `None` keeps the stored value
#[derive(Debug, Clone)]
pub struct OperationChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub radius_km: Option<Decimal>,
    pub status: OperationStatus,
    pub stamps: StatusStamps,
}

#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub operation_id: Uuid,
    pub invitee_id: Uuid,
    pub invited_by: Uuid,
    pub role: MemberRole,
}

#[derive(Debug, Clone)]
pub struct CreateDailyLog {
    pub operation_id: Uuid,
    pub author_id: Uuid,
    pub log_date: NaiveDate,
    pub summary: String,
    pub personnel_count: i32,
    pub incidents_handled: i32,
}
