use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Verified,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    /// Whether a coordinator may move a report from `self` to `next`
    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        use ReportStatus::*;
        matches!(
            (self, next),
            (Pending, Verified)
                | (Pending, Rejected)
                | (Verified, InProgress)
                | (Verified, Rejected)
                | (InProgress, Resolved)
        )
    }

    pub fn is_open(self) -> bool {
        matches!(
            self,
            ReportStatus::Pending | ReportStatus::Verified | ReportStatus::InProgress
        )
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Verified => write!(f, "verified"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::Resolved => write!(f, "resolved"),
            ReportStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Report severity enum matching database enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportSeverity::Low => write!(f, "low"),
            ReportSeverity::Medium => write!(f, "medium"),
            ReportSeverity::High => write!(f, "high"),
            ReportSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Where a report came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Emergency report raised by a citizen or responder
    #[default]
    Emergency,
    /// Community contribution (supplies, shelter offers, volunteer info)
    Contribution,
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Emergency => write!(f, "emergency"),
            ReportKind::Contribution => write!(f, "contribution"),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
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

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub organization_id: Option<Uuid>,
    pub reporter_id: Option<Uuid>,
    pub kind: ReportKind,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub severity: ReportSeverity,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

/// Filters for report listings; `None` means "any"
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub organization_id: Option<Uuid>,
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
    pub kind: Option<ReportKind>,
}
