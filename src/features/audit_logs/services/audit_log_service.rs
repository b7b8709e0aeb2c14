use std::sync::Arc;

use crate::core::error::Result;
use crate::features::audit_logs::dtos::AuditLogResponseDto;
use crate::features::audit_logs::models::{AuditLogFilter, NewAuditLog};
use crate::features::audit_logs::repositories::AuditLogRepository;

/// Service for recording and reading the audit trail
pub struct AuditLogService {
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// Append an entry. The action it describes has already happened, so a
    /// failure here is logged and swallowed.
    pub async fn record(&self, entry: NewAuditLog) {
        if let Err(e) = self.repository.append(&entry).await {
            tracing::warn!(
                action = entry.action.as_str(),
                entity_type = entry.entity_type,
                "Failed to record audit log: {}",
                e
            );
        }
    }

    pub async fn list(
        &self,
        filter: &AuditLogFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AuditLogResponseDto>, i64)> {
        let (rows, total) = self.repository.list(filter, offset, limit).await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::audit_logs::models::AuditAction;
    use crate::features::audit_logs::repositories::MemoryAuditLogRepository;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_record_and_filter_by_organization() {
        let repo = Arc::new(MemoryAuditLogRepository::new());
        let service = AuditLogService::new(repo.clone());
        let org = Uuid::new_v4();
        let actor = Uuid::new_v4();

        service
            .record(
                NewAuditLog::new(actor, AuditAction::AssignmentCreated, "assignment", None)
                    .in_organization(Some(org))
                    .with_details(json!({"priority": "high"})),
            )
            .await;
        service
            .record(NewAuditLog::new(
                actor,
                AuditAction::ApiKeyCreated,
                "api_key",
                None,
            ))
            .await;

        let filter = AuditLogFilter {
            organization_id: Some(org),
            ..Default::default()
        };
        let (items, total) = service.list(&filter, 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].action, "assignment_created");
        assert_eq!(items[0].details["priority"], "high");
    }
}
