use async_trait::async_trait;
use sqlx::PgPool;

use super::AuditLogRepository;
use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditLog, AuditLogFilter, NewAuditLog};

/// Postgres-backed audit trail
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn append(&self, entry: &NewAuditLog) -> Result<AuditLog> {
        sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (organization_id, actor_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, organization_id, actor_id, action, entity_type, entity_id, details, created_at
            "#,
        )
        .bind(entry.organization_id)
        .bind(entry.actor_id)
        .bind(entry.action.as_str())
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to append audit log: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list(
        &self,
        filter: &AuditLogFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AuditLog>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM audit_logs
            WHERE ($1::uuid IS NULL OR organization_id = $1)
              AND ($2::uuid IS NULL OR actor_id = $2)
              AND ($3::text IS NULL OR entity_type = $3)
              AND ($4::uuid IS NULL OR entity_id = $4)
            "#,
        )
        .bind(filter.organization_id)
        .bind(filter.actor_id)
        .bind(filter.entity_type.as_deref())
        .bind(filter.entity_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count audit logs: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT id, organization_id, actor_id, action, entity_type, entity_id, details, created_at
            FROM audit_logs
            WHERE ($1::uuid IS NULL OR organization_id = $1)
              AND ($2::uuid IS NULL OR actor_id = $2)
              AND ($3::text IS NULL OR entity_type = $3)
              AND ($4::uuid IS NULL OR entity_id = $4)
            ORDER BY created_at DESC
            OFFSET $5 LIMIT $6
            "#,
        )
        .bind(filter.organization_id)
        .bind(filter.actor_id)
        .bind(filter.entity_type.as_deref())
        .bind(filter.entity_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list audit logs: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }
}
