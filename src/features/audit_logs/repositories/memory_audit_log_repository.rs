use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AuditLogRepository;
use crate::core::error::Result;
use crate::features::audit_logs::models::{AuditLog, AuditLogFilter, NewAuditLog};

/// In-process audit trail for tests
#[derive(Default)]
pub struct MemoryAuditLogRepository {
    rows: RwLock<Vec<AuditLog>>,
}

impl MemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn actions(&self) -> Vec<String> {
        self.rows.read().await.iter().map(|r| r.action.clone()).collect()
    }
}

#[async_trait]
impl AuditLogRepository for MemoryAuditLogRepository {
    async fn append(&self, entry: &NewAuditLog) -> Result<AuditLog> {
        let row = AuditLog {
            id: Uuid::now_v7(),
            organization_id: entry.organization_id,
            actor_id: entry.actor_id,
            action: entry.action.as_str().to_string(),
            entity_type: entry.entity_type.to_string(),
            entity_id: entry.entity_id,
            details: entry.details.clone(),
            created_at: Utc::now(),
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn list(
        &self,
        filter: &AuditLogFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AuditLog>, i64)> {
        let rows = self.rows.read().await;
        let matching: Vec<AuditLog> = rows
            .iter()
            .rev()
            .filter(|r| filter.organization_id.map_or(true, |v| Some(v) == r.organization_id))
            .filter(|r| filter.actor_id.map_or(true, |v| v == r.actor_id))
            .filter(|r| {
                filter
                    .entity_type
                    .as_deref()
                    .map_or(true, |v| v == r.entity_type)
            })
            .filter(|r| filter.entity_id.map_or(true, |v| Some(v) == r.entity_id))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }
}
