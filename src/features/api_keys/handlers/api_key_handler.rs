use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::api_keys::dtos::{
    ApiKeyQueryParams, ApiKeyResponseDto, CreateApiKeyDto, CreatedApiKeyDto,
};
use crate::features::api_keys::services::ApiKeyService;
use crate::features::auth::guards::RequireOrgAdmin;
use crate::shared::types::ApiResponse;

/// Create an API key
#[utoipa::path(
    post,
    path = "/api/admin/api-keys",
    request_body = CreateApiKeyDto,
    responses(
        (status = 200, description = "API key created; the key is shown only once", body = ApiResponse<CreatedApiKeyDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Organization admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_api_key(
    RequireOrgAdmin(user): RequireOrgAdmin,
    State(service): State<Arc<ApiKeyService>>,
    ValidatedJson(dto): ValidatedJson<CreateApiKeyDto>,
) -> Result<Json<ApiResponse<CreatedApiKeyDto>>> {
    let created = service.create(&user, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(created),
        Some("Store this key now; it will not be shown again".to_string()),
        None,
    )))
}

/// List API keys
#[utoipa::path(
    get,
    path = "/api/admin/api-keys",
    params(ApiKeyQueryParams),
    responses(
        (status = 200, description = "List of API keys", body = ApiResponse<Vec<ApiKeyResponseDto>>),
        (status = 403, description = "Forbidden - Organization admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_api_keys(
    RequireOrgAdmin(user): RequireOrgAdmin,
    State(service): State<Arc<ApiKeyService>>,
    Query(params): Query<ApiKeyQueryParams>,
) -> Result<Json<ApiResponse<Vec<ApiKeyResponseDto>>>> {
    let organization_id = user.scoped_organization(params.organization_id)?;
    let keys = service.list(organization_id, params.include_revoked).await?;
    Ok(Json(ApiResponse::success(Some(keys), None, None)))
}

/// Revoke an API key
#[utoipa::path(
    delete,
    path = "/api/admin/api-keys/{id}",
    params(
        ("id" = Uuid, Path, description = "API key ID")
    ),
    responses(
        (status = 200, description = "API key revoked", body = ApiResponse<ApiKeyResponseDto>),
        (status = 403, description = "Forbidden - Organization admin access required"),
        (status = 404, description = "API key not found"),
        (status = 409, description = "API key already revoked")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn revoke_api_key(
    RequireOrgAdmin(user): RequireOrgAdmin,
    State(service): State<Arc<ApiKeyService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ApiKeyResponseDto>>> {
    let revoked = service.revoke(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(revoked),
        Some("API key revoked".to_string()),
        None,
    )))
}
