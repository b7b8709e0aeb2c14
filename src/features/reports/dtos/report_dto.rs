use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{Report, ReportKind, ReportSeverity, ReportStatus};
use crate::shared::types::{default_page, default_page_size};

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub reporter_id: Option<Uuid>,
    pub kind: ReportKind,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub severity: ReportSeverity,
    pub status: ReportStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            organization_id: r.organization_id,
            reporter_id: r.reporter_id,
            kind: r.kind,
            title: r.title,
            description: r.description,
            category: r.category,
            severity: r.severity,
            status: r.status,
            latitude: r.latitude,
            longitude: r.longitude,
            address: r.address,
            created_at: r.created_at,
            updated_at: r.updated_at,
            resolved_at: r.resolved_at,
        }
    }
}

/// Report annotated with its distance from the query point
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NearbyReportDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub distance_km: f64,
}

/// Request DTO for submitting a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    /// Target organization; ignored for organization members (their own is used)
    pub organization_id: Option<Uuid>,
    pub kind: Option<ReportKind>,
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub severity: Option<ReportSeverity>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

/// Request DTO for updating report status
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// Query parameters for listing reports
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReportQueryParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
    pub kind: Option<ReportKind>,
    /// Restrict to an organization (super admin only; others are pinned to their own)
    pub organization_id: Option<Uuid>,
}

/// Query parameters for the geofence search
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct NearbyReportsQuery {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in kilometres, (0, 500]
    pub radius_km: f64,
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
}
