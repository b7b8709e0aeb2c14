use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};
use crate::shared::geo::BoundingBox;

const REPORT_COLUMNS: &str = r#"
    id, organization_id, reporter_id, kind, title, description, category,
    severity, status, latitude, longitude, address,
    created_at, updated_at, resolved_at
"#;

/// Upper bound on rows scanned by a geofence query
const MAX_GEOFENCE_CANDIDATES: i64 = 5000;

/// Postgres-backed report store
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn insert(&self, data: &CreateReport) -> Result<Report> {
        let sql = format!(
            r#"
            INSERT INTO reports (
                organization_id, reporter_id, kind, title, description, category,
                severity, status, latitude, longitude, address
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9, $10)
            RETURNING {REPORT_COLUMNS}
            "#
        );

        let report = sqlx::query_as::<_, Report>(&sql)
            .bind(data.organization_id)
            .bind(data.reporter_id)
            .bind(data.kind)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.category.as_deref())
            .bind(data.severity)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(data.address.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Created report: {} ({})", report.id, report.kind);
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let sql = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1");

        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get report: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(
        &self,
        filter: &ReportFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Report>, i64)> {
        const WHERE_CLAUSE: &str = r#"
            WHERE ($1::uuid IS NULL OR organization_id = $1)
              AND ($2::report_status IS NULL OR status = $2)
              AND ($3::report_severity IS NULL OR severity = $3)
              AND ($4::report_kind IS NULL OR kind = $4)
        "#;

        let count_sql = format!("SELECT COUNT(*) FROM reports {WHERE_CLAUSE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.organization_id)
            .bind(filter.status)
            .bind(filter.severity)
            .bind(filter.kind)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;

        let list_sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports
            {WHERE_CLAUSE}
            ORDER BY created_at DESC
            OFFSET $5 LIMIT $6
            "#
        );
        let items = sqlx::query_as::<_, Report>(&list_sql)
            .bind(filter.organization_id)
            .bind(filter.status)
            .bind(filter.severity)
            .bind(filter.kind)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    async fn list_in_bounds(
        &self,
        bounds: &BoundingBox,
        filter: &ReportFilter,
    ) -> Result<Vec<Report>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
              AND ($5::uuid IS NULL OR organization_id = $5)
              AND ($6::report_status IS NULL OR status = $6)
              AND ($7::report_severity IS NULL OR severity = $7)
              AND ($8::report_kind IS NULL OR kind = $8)
            LIMIT $9
            "#
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(bounds.min_lat)
            .bind(bounds.max_lat)
            .bind(bounds.min_lon)
            .bind(bounds.max_lon)
            .bind(filter.organization_id)
            .bind(filter.status)
            .bind(filter.severity)
            .bind(filter.kind)
            .bind(MAX_GEOFENCE_CANDIDATES)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query reports in bounds: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: ReportStatus,
        next: ReportStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Report>> {
        let sql = format!(
            r#"
            UPDATE reports
            SET status = $3,
                resolved_at = CASE WHEN $3 = 'resolved'::report_status THEN $4 ELSE resolved_at END,
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {REPORT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .bind(expected)
            .bind(next)
            .bind(at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report status: {:?}", e);
                AppError::Database(e)
            })
    }
}
