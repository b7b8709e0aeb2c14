use std::sync::Arc;

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::api_keys::dtos::{ApiKeyResponseDto, CreateApiKeyDto, CreatedApiKeyDto};
use crate::features::api_keys::models::{ApiKey, GeneratedKey};
use crate::features::audit_logs::{AuditAction, AuditLogService, NewAuditLog};
use crate::features::auth::model::AuthenticatedUser;

const API_KEY_COLUMNS: &str = r#"
    id, organization_id, name, prefix, key_hash, created_by,
    created_at, last_used_at, revoked_at
"#;

/// Service for organization API keys
pub struct ApiKeyService {
    pool: PgPool,
    audit: Arc<AuditLogService>,
}

impl ApiKeyService {
    pub fn new(pool: PgPool, audit: Arc<AuditLogService>) -> Self {
        Self { pool, audit }
    }

    /// Create a key; the plaintext is only ever returned from here
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: &CreateApiKeyDto,
    ) -> Result<CreatedApiKeyDto> {
        let organization_id = user
            .scoped_organization(dto.organization_id)?
            .ok_or_else(|| AppError::BadRequest("organization_id is required".to_string()))?;

        let generated = GeneratedKey::generate();

        let sql = format!(
            r#"
            INSERT INTO api_keys (organization_id, name, prefix, key_hash, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {API_KEY_COLUMNS}
            "#
        );
        let api_key = sqlx::query_as::<_, ApiKey>(&sql)
            .bind(organization_id)
            .bind(dto.name.trim())
            .bind(&generated.prefix)
            .bind(&generated.hash)
            .bind(user.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create API key: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Created API key {} ({}…) for organization {}",
            api_key.id,
            api_key.prefix,
            organization_id
        );

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::ApiKeyCreated,
                    "api_key",
                    Some(api_key.id),
                )
                .in_organization(Some(organization_id))
                .with_details(json!({ "name": api_key.name, "prefix": api_key.prefix })),
            )
            .await;

        Ok(CreatedApiKeyDto {
            api_key: api_key.into(),
            key: generated.plaintext,
        })
    }

    pub async fn list(
        &self,
        organization_id: Option<Uuid>,
        include_revoked: bool,
    ) -> Result<Vec<ApiKeyResponseDto>> {
        let sql = format!(
            r#"
            SELECT {API_KEY_COLUMNS}
            FROM api_keys
            WHERE ($1::uuid IS NULL OR organization_id = $1)
              AND ($2 OR revoked_at IS NULL)
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, ApiKey>(&sql)
            .bind(organization_id)
            .bind(include_revoked)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list API keys: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn revoke(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiKeyResponseDto> {
        let sql = format!("SELECT {API_KEY_COLUMNS} FROM api_keys WHERE id = $1");
        let existing = sqlx::query_as::<_, ApiKey>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get API key: {:?}", e);
                AppError::Database(e)
            })?
            .filter(|k| user.can_access_organization(k.organization_id))
            .ok_or_else(|| AppError::NotFound(format!("API key {} not found", id)))?;

        if existing.is_revoked() {
            return Err(AppError::Conflict(format!(
                "API key {} is already revoked",
                id
            )));
        }

        let sql = format!(
            r#"
            UPDATE api_keys
            SET revoked_at = NOW()
            WHERE id = $1 AND revoked_at IS NULL
            RETURNING {API_KEY_COLUMNS}
            "#
        );
        let revoked = sqlx::query_as::<_, ApiKey>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to revoke API key: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::Conflict(format!("API key {} is already revoked", id)))?;

        tracing::info!("Revoked API key {} ({}…)", revoked.id, revoked.prefix);

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::ApiKeyRevoked,
                    "api_key",
                    Some(revoked.id),
                )
                .in_organization(Some(revoked.organization_id))
                .with_details(json!({ "name": revoked.name, "prefix": revoked.prefix })),
            )
            .await;

        Ok(revoked.into())
    }
}
