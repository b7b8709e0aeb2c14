mod pg_audit_log_repository;

#[cfg(test)]
mod memory_audit_log_repository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::audit_logs::models::{AuditLog, AuditLogFilter, NewAuditLog};

pub use pg_audit_log_repository::PgAuditLogRepository;

#[cfg(test)]
pub use memory_audit_log_repository::MemoryAuditLogRepository;

/// Append-only audit trail storage
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: &NewAuditLog) -> Result<AuditLog>;

    /// Page of entries (newest first) plus the total matching count
    async fn list(
        &self,
        filter: &AuditLogFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AuditLog>, i64)>;
}
