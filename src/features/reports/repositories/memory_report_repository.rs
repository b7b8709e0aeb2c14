use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};
use crate::shared::geo::BoundingBox;

/// In-process report store for tests
#[derive(Default)]
pub struct MemoryReportRepository {
    rows: RwLock<HashMap<Uuid, Report>>,
}

impl MemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(filter: &ReportFilter, r: &Report) -> bool {
        filter.organization_id.map_or(true, |v| Some(v) == r.organization_id)
            && filter.status.map_or(true, |v| v == r.status)
            && filter.severity.map_or(true, |v| v == r.severity)
            && filter.kind.map_or(true, |v| v == r.kind)
    }
}

#[async_trait]
impl ReportRepository for MemoryReportRepository {
    async fn insert(&self, data: &CreateReport) -> Result<Report> {
        let now = Utc::now();
        let report = Report {
            id: Uuid::now_v7(),
            organization_id: data.organization_id,
            reporter_id: data.reporter_id,
            kind: data.kind,
            title: data.title.clone(),
            description: data.description.clone(),
            category: data.category.clone(),
            severity: data.severity,
            status: ReportStatus::Pending,
            latitude: data.latitude,
            longitude: data.longitude,
            address: data.address.clone(),
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };
        self.rows.write().await.insert(report.id, report.clone());
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &ReportFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Report>, i64)> {
        let rows = self.rows.read().await;
        let mut items: Vec<Report> = rows
            .values()
            .filter(|r| Self::matches(filter, r))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_in_bounds(
        &self,
        bounds: &BoundingBox,
        filter: &ReportFilter,
    ) -> Result<Vec<Report>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|r| bounds.contains(r.latitude, r.longitude) && Self::matches(filter, r))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: ReportStatus,
        next: ReportStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Report>> {
        let mut rows = self.rows.write().await;
        Ok(rows
            .get_mut(&id)
            .filter(|r| r.status == expected)
            .map(|r| {
                r.status = next;
                if next == ReportStatus::Resolved {
                    r.resolved_at = Some(at);
                }
                r.updated_at = Utc::now();
                r.clone()
            }))
    }
}
