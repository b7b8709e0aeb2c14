use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{HEALTH_HEALTHY_THRESHOLD, HEALTH_WARNING_THRESHOLD};

/// Database model for organization
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Raw counts over the health window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct HealthInputs {
    pub total_assignments: i64,
    pub completed_assignments: i64,
    pub declined_assignments: i64,
    /// Pending longer than the configured threshold without acceptance
    pub stale_pending_assignments: i64,
    pub active_responders: i64,
    pub open_critical_reports: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthClassification {
    Healthy,
    Warning,
    Critical,
}

impl HealthClassification {
    pub fn from_score(score: f64) -> Self {
        if score >= HEALTH_HEALTHY_THRESHOLD {
            HealthClassification::Healthy
        } else if score >= HEALTH_WARNING_THRESHOLD {
            HealthClassification::Warning
        } else {
            HealthClassification::Critical
        }
    }
}

/// Computed score with the penalties that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthAssessment {
    pub score: f64,
    pub classification: HealthClassification,
    pub flags: Vec<String>,
    pub completion_rate: f64,
    pub decline_rate: f64,
    pub stale_pending_rate: f64,
}

const DECLINE_RATE_WEIGHT: f64 = 40.0;
const STALE_PENDING_WEIGHT: f64 = 30.0;
const NO_RESPONDERS_PENALTY: f64 = 20.0;
const CRITICAL_REPORT_PENALTY: f64 = 5.0;
const CRITICAL_REPORT_PENALTY_CAP: f64 = 20.0;

pub const FLAG_HIGH_DECLINE_RATE: &str = "high_decline_rate";
pub const FLAG_STALE_PENDING: &str = "stale_pending_assignments";
pub const FLAG_NO_ACTIVE_RESPONDERS: &str = "no_active_responders";
pub const FLAG_OPEN_CRITICAL_REPORTS: &str = "open_critical_reports";

fn ratio(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        part.max(0) as f64 / whole as f64
    }
}

impl HealthInputs {
    /// Score = 100 minus penalties, clamped to [0, 100] and rounded to one decimal
    pub fn assess(&self) -> HealthAssessment {
        let completion_rate = ratio(self.completed_assignments, self.total_assignments);
        let decline_rate = ratio(self.declined_assignments, self.total_assignments);
        let stale_pending_rate = ratio(self.stale_pending_assignments, self.total_assignments);

        let mut penalty = 0.0;
        let mut flags = Vec::new();

        if decline_rate > 0.0 {
            penalty += decline_rate * DECLINE_RATE_WEIGHT;
            flags.push(FLAG_HIGH_DECLINE_RATE.to_string());
        }
        if stale_pending_rate > 0.0 {
            penalty += stale_pending_rate * STALE_PENDING_WEIGHT;
            flags.push(FLAG_STALE_PENDING.to_string());
        }
        if self.active_responders <= 0 {
            penalty += NO_RESPONDERS_PENALTY;
            flags.push(FLAG_NO_ACTIVE_RESPONDERS.to_string());
        }
        if self.open_critical_reports > 0 {
            penalty += (self.open_critical_reports as f64 * CRITICAL_REPORT_PENALTY)
                .min(CRITICAL_REPORT_PENALTY_CAP);
            flags.push(FLAG_OPEN_CRITICAL_REPORTS.to_string());
        }

        let score = ((100.0 - penalty).clamp(0.0, 100.0) * 10.0).round() / 10.0;

        HealthAssessment {
            score,
            classification: HealthClassification::from_score(score),
            flags,
            completion_rate,
            decline_rate,
            stale_pending_rate,
        }
    }
}
