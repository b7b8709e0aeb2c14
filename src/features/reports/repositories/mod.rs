mod pg_report_repository;

#[cfg(test)]
mod memory_report_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};
use crate::shared::geo::BoundingBox;

pub use pg_report_repository::PgReportRepository;

#[cfg(test)]
pub use memory_report_repository::MemoryReportRepository;

/// Persistence seam for reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, data: &CreateReport) -> Result<Report>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>>;

    /// Page of reports (newest first) plus the total matching count
    async fn list(
        &self,
        filter: &ReportFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Report>, i64)>;

    /// Reports whose coordinates fall inside the box
    async fn list_in_bounds(
        &self,
        bounds: &BoundingBox,
        filter: &ReportFilter,
    ) -> Result<Vec<Report>>;

    /// Compare-and-set status update; `Ok(None)` when the row moved on
    async fn update_status(
        &self,
        id: Uuid,
        expected: ReportStatus,
        next: ReportStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Report>>;
}
