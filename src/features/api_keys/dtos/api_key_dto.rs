use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::api_keys::models::ApiKey;

/// Response DTO for API key (never includes the secret)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyResponseDto {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub prefix: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl From<ApiKey> for ApiKeyResponseDto {
    fn from(k: ApiKey) -> Self {
        Self {
            id: k.id,
            organization_id: k.organization_id,
            name: k.name,
            prefix: k.prefix,
            created_by: k.created_by,
            created_at: k.created_at,
            last_used_at: k.last_used_at,
            revoked_at: k.revoked_at,
        }
    }
}

/// Returned once on creation; `key` cannot be retrieved again
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedApiKeyDto {
    #[serde(flatten)]
    pub api_key: ApiKeyResponseDto,
    pub key: String,
}

/// Request DTO for creating an API key
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateApiKeyDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    /// Owning organization; only honoured for super admins
    pub organization_id: Option<Uuid>,
}

/// Query parameters for listing API keys
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ApiKeyQueryParams {
    /// Include revoked keys (default: false)
    #[serde(default)]
    pub include_revoked: bool,
    /// Super admin only; others are pinned to their own organization
    pub organization_id: Option<Uuid>,
}
