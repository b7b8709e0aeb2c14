use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::assignments::models::Assignment;
use crate::features::reports::models::Report;

/// Output format for exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Query parameters for export endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// csv (default) or json
    #[serde(default)]
    pub format: ExportFormat,
    /// Super admin only; others are pinned to their own organization
    pub organization_id: Option<Uuid>,
}

/// Rendered export ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub rows: usize,
}

/// Flat assignment row; column order is the CSV header order
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentExportRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub report_id: Uuid,
    pub responder_id: Uuid,
    pub operation_id: Option<Uuid>,
    pub status: String,
    pub priority: String,
    pub notes: Option<String>,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub decline_reason: Option<String>,
}

impl From<Assignment> for AssignmentExportRow {
    fn from(a: Assignment) -> Self {
        Self {
            id: a.id,
            organization_id: a.organization_id,
            report_id: a.report_id,
            responder_id: a.responder_id,
            operation_id: a.operation_id,
            status: a.status.to_string(),
            priority: a.priority.to_string(),
            notes: a.notes,
            assigned_by: a.assigned_by,
            assigned_at: a.assigned_at,
            accepted_at: a.accepted_at,
            started_at: a.started_at,
            completed_at: a.completed_at,
            declined_at: a.declined_at,
            decline_reason: a.decline_reason,
        }
    }
}

/// Flat report row; column order is the CSV header order
#[derive(Debug, Clone, Serialize)]
pub struct ReportExportRow {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub reporter_id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub severity: String,
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<Report> for ReportExportRow {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            organization_id: r.organization_id,
            reporter_id: r.reporter_id,
            kind: r.kind.to_string(),
            title: r.title,
            description: r.description,
            category: r.category,
            severity: r.severity.to_string(),
            status: r.status.to_string(),
            latitude: r.latitude,
            longitude: r.longitude,
            address: r.address,
            created_at: r.created_at,
            resolved_at: r.resolved_at,
        }
    }
}

/// Serialize rows in the requested format.
///
/// CSV always carries a header line, even with no rows.
pub fn render<T: Serialize>(
    rows: &[T],
    headers: &[&str],
    format: ExportFormat,
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => serde_json::to_vec(rows)
            .map_err(|e| AppError::Internal(format!("Failed to encode export: {}", e))),
        ExportFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(Vec::new());
            writer.write_record(headers).map_err(csv_error)?;
            for row in rows {
                writer.serialize(row).map_err(csv_error)?;
            }
            writer
                .into_inner()
                .map_err(|e| AppError::Internal(format!("Failed to flush export: {}", e)))
        }
    }
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("Failed to write CSV: {}", e))
}

pub const ASSIGNMENT_HEADERS: &[&str] = &[
    "id",
    "organization_id",
    "report_id",
    "responder_id",
    "operation_id",
    "status",
    "priority",
    "notes",
    "assigned_by",
    "assigned_at",
    "accepted_at",
    "started_at",
    "completed_at",
    "declined_at",
    "decline_reason",
];

pub const REPORT_HEADERS: &[&str] = &[
    "id",
    "organization_id",
    "reporter_id",
    "kind",
    "title",
    "description",
    "category",
    "severity",
    "status",
    "latitude",
    "longitude",
    "address",
    "created_at",
    "resolved_at",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::assignments::models::{AssignmentPriority, AssignmentStatus};

    fn assignment() -> Assignment {
        let now = Utc::now();
        Assignment {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            report_id: Uuid::new_v4(),
            responder_id: Uuid::new_v4(),
            operation_id: None,
            status: AssignmentStatus::Declined,
            priority: AssignmentPriority::Urgent,
            notes: Some("needs boat, \"quickly\"".to_string()),
            assigned_by: Uuid::new_v4(),
            assigned_at: now,
            accepted_at: None,
            started_at: None,
            completed_at: None,
            declined_at: Some(now),
            decline_reason: Some("out of area".to_string()),
            updated_at: now,
        }
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let row = AssignmentExportRow::from(assignment());
        let body = render(&[row.clone()], ASSIGNMENT_HEADERS, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(body).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), ASSIGNMENT_HEADERS.join(","));
        let data = lines.next().unwrap();
        assert!(data.starts_with(&row.id.to_string()));
        assert!(data.contains(",declined,urgent,"));
        // embedded quotes are doubled inside a quoted field
        assert!(data.contains("\"needs boat, \"\"quickly\"\"\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_header_matches_row_width() {
        let body = render(
            &[AssignmentExportRow::from(assignment())],
            ASSIGNMENT_HEADERS,
            ExportFormat::Csv,
        )
        .unwrap();
        let mut reader = csv::Reader::from_reader(body.as_slice());
        let width = reader.headers().unwrap().len();
        for record in reader.records() {
            assert_eq!(record.unwrap().len(), width);
        }
    }

    #[test]
    fn test_empty_csv_still_has_header() {
        let body = render::<ReportExportRow>(&[], REPORT_HEADERS, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert_eq!(text.trim_end(), REPORT_HEADERS.join(","));
    }

    #[test]
    fn test_json_is_array() {
        let body = render(
            &[AssignmentExportRow::from(assignment())],
            ASSIGNMENT_HEADERS,
            ExportFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["status"], "declined");
        assert_eq!(value[0]["decline_reason"], "out of area");
    }

    #[test]
    fn test_format_defaults_to_csv() {
        let q: ExportQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.format, ExportFormat::Csv);
        assert_eq!(ExportFormat::Json.extension(), "json");
    }
}
