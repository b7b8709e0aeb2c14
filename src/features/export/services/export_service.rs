use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::assignments::models::AssignmentFilter;
use crate::features::assignments::repositories::AssignmentRepository;
use crate::features::audit_logs::{AuditAction, AuditLogService, NewAuditLog};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::export::models::{
    render, AssignmentExportRow, ExportFile, ExportFormat, ReportExportRow, ASSIGNMENT_HEADERS,
    REPORT_HEADERS,
};
use crate::features::reports::models::ReportFilter;
use crate::features::reports::repositories::ReportRepository;
use crate::shared::constants::{EXPORT_BATCH_SIZE, EXPORT_MAX_ROWS};

/// Bulk export of organization data
pub struct ExportService {
    assignments: Arc<dyn AssignmentRepository>,
    reports: Arc<dyn ReportRepository>,
    audit: Arc<AuditLogService>,
}

/// Page through a listing until it runs dry or the row cap is hit
async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<(Vec<T>, i64)>
where
    F: FnMut(i64, i64) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, i64)>>,
{
    let mut rows = Vec::new();
    let mut total = 0;
    loop {
        let offset = rows.len() as i64;
        let limit = EXPORT_BATCH_SIZE.min(EXPORT_MAX_ROWS - offset);
        if limit <= 0 {
            break;
        }
        let (batch, count) = fetch(offset, limit).await?;
        total = count;
        let fetched = batch.len() as i64;
        rows.extend(batch);
        if fetched < limit || rows.len() as i64 >= total {
            break;
        }
    }
    Ok((rows, total))
}

impl ExportService {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        reports: Arc<dyn ReportRepository>,
        audit: Arc<AuditLogService>,
    ) -> Self {
        Self {
            assignments,
            reports,
            audit,
        }
    }

    pub async fn export_assignments(
        &self,
        user: &AuthenticatedUser,
        organization_id: Option<Uuid>,
        format: ExportFormat,
    ) -> Result<ExportFile> {
        let filter = AssignmentFilter {
            organization_id,
            ..Default::default()
        };
        let (assignments, total) = collect_pages(|offset, limit| {
            let filter = &filter;
            async move { self.assignments.list(filter, offset, limit).await }
        })
        .await?;

        let rows: Vec<AssignmentExportRow> = assignments.into_iter().map(Into::into).collect();
        let body = render(&rows, ASSIGNMENT_HEADERS, format)?;
        self.finish(user, organization_id, "assignments", format, body, rows.len(), total)
            .await
    }

    pub async fn export_reports(
        &self,
        user: &AuthenticatedUser,
        organization_id: Option<Uuid>,
        format: ExportFormat,
    ) -> Result<ExportFile> {
        let filter = ReportFilter {
            organization_id,
            ..Default::default()
        };
        let (reports, total) = collect_pages(|offset, limit| {
            let filter = &filter;
            async move { self.reports.list(filter, offset, limit).await }
        })
        .await?;

        let rows: Vec<ReportExportRow> = reports.into_iter().map(Into::into).collect();
        let body = render(&rows, REPORT_HEADERS, format)?;
        self.finish(user, organization_id, "reports", format, body, rows.len(), total)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn finish(
        &self,
        user: &AuthenticatedUser,
        organization_id: Option<Uuid>,
        entity: &'static str,
        format: ExportFormat,
        body: Vec<u8>,
        rows: usize,
        total: i64,
    ) -> Result<ExportFile> {
        if (rows as i64) < total {
            tracing::warn!(
                "Export of {} truncated to {} of {} rows",
                entity,
                rows,
                total
            );
        }
        tracing::info!(
            "User {} exported {} {} as {}",
            user.user_id,
            rows,
            entity,
            format.extension()
        );

        self.audit
            .record(
                NewAuditLog::new(user.user_id, AuditAction::DataExported, entity, None)
                    .in_organization(organization_id)
                    .with_details(json!({
                        "format": format.extension(),
                        "rows": rows,
                        "truncated": (rows as i64) < total,
                    })),
            )
            .await;

        Ok(ExportFile {
            filename: format!(
                "{}-{}.{}",
                entity,
                Utc::now().format("%Y%m%d%H%M%S"),
                format.extension()
            ),
            content_type: format.content_type(),
            body,
            rows,
        })
    }
}
