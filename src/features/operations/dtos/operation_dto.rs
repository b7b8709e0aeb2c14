use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::operations::models::{
    DailyLog, InvitationStatus, MemberRole, Operation, OperationInvitation, OperationMember,
    OperationStatus,
};
use crate::features::reports::models::{ReportSeverity, ReportStatus};
use crate::shared::constants::MAX_GEOFENCE_RADIUS_WHOLE_KM;
use crate::shared::types::{default_page, default_page_size};

fn validate_radius(radius_km: &Decimal) -> Result<(), ValidationError> {
    let max = Decimal::from(MAX_GEOFENCE_RADIUS_WHOLE_KM);
    if *radius_km <= Decimal::ZERO || *radius_km > max {
        let mut err = ValidationError::new("radius_range");
        err.message = Some(format!("radius_km must be in (0, {}]", max).into());
        return Err(err);
    }
    Ok(())
}

/// Response DTO for operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperationResponseDto {
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

impl From<Operation> for OperationResponseDto {
    fn from(o: Operation) -> Self {
        Self {
            id: o.id,
            organization_id: o.organization_id,
            name: o.name,
            description: o.description,
            status: o.status,
            center_latitude: o.center_latitude,
            center_longitude: o.center_longitude,
            radius_km: o.radius_km,
            started_at: o.started_at,
            ended_at: o.ended_at,
            created_by: o.created_by,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// Request DTO for creating an operation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOperationDto {
    /// Owning organization; only honoured for super admins
    pub organization_id: Option<Uuid>,
    #[validate(length(min = 3, max = 150, message = "Name must be 3-150 characters"))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub center_latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub center_longitude: f64,
    #[validate(custom(function = "validate_radius"))]
    #[schema(value_type = f64)]
    pub radius_km: Decimal,
}

/// Request DTO for updating an operation; omitted fields are unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOperationDto {
    #[validate(length(min = 3, max = 150, message = "Name must be 3-150 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_radius"))]
    #[schema(value_type = Option<f64>)]
    pub radius_km: Option<Decimal>,
    pub status: Option<OperationStatus>,
}

/// Query parameters for listing operations
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct OperationQueryParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub status: Option<OperationStatus>,
    /// Restrict to an organization (super admin only; others are pinned to their own)
    pub organization_id: Option<Uuid>,
}

/// Query parameters for the operation geofence
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct OperationReportsQuery {
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperationMemberDto {
    pub operation_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl From<OperationMember> for OperationMemberDto {
    fn from(m: OperationMember) -> Self {
        Self {
            operation_id: m.operation_id,
            user_id: m.user_id,
            role: m.role,
            joined_at: m.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvitationResponseDto {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub invitee_id: Uuid,
    pub invited_by: Uuid,
    pub role: MemberRole,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<OperationInvitation> for InvitationResponseDto {
    fn from(i: OperationInvitation) -> Self {
        Self {
            id: i.id,
            operation_id: i.operation_id,
            invitee_id: i.invitee_id,
            invited_by: i.invited_by,
            role: i.role,
            status: i.status,
            created_at: i.created_at,
            responded_at: i.responded_at,
        }
    }
}

/// Request DTO for inviting a user to an operation team
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct InviteMemberDto {
    pub invitee_id: Uuid,
    pub role: Option<MemberRole>,
}

/// Query parameters for the caller's invitations
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct MyInvitationsQuery {
    /// Defaults to pending
    pub status: Option<InvitationStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyLogResponseDto {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub author_id: Uuid,
    pub log_date: NaiveDate,
    pub summary: String,
    pub personnel_count: i32,
    pub incidents_handled: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DailyLog> for DailyLogResponseDto {
    fn from(l: DailyLog) -> Self {
        Self {
            id: l.id,
            operation_id: l.operation_id,
            author_id: l.author_id,
            log_date: l.log_date,
            summary: l.summary,
            personnel_count: l.personnel_count,
            incidents_handled: l.incidents_handled,
            created_at: l.created_at,
        }
    }
}

/// Request DTO for submitting a daily log
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDailyLogDto {
    /// Defaults to today (UTC)
    pub log_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 10000, message = "Summary must be 1-10000 characters"))]
    pub summary: String,
    #[validate(range(min = 0))]
    pub personnel_count: i32,
    #[validate(range(min = 0))]
    pub incidents_handled: i32,
}

/// Query parameters for listing daily logs
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DailyLogQueryParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub author_id: Option<Uuid>,
}
