use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::{RequireCoordinator, RequireSuperAdmin};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::organizations::dtos::{
    CreateOrganizationDto, OrganizationHealthDto, OrganizationResponseDto,
};
use crate::features::organizations::services::OrganizationService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

fn ensure_access(user: &AuthenticatedUser, id: Uuid) -> Result<()> {
    if user.can_access_organization(id) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Organization {} not found", id)))
    }
}

/// Create an organization (super admin only)
#[utoipa::path(
    post,
    path = "/api/organizations",
    request_body = CreateOrganizationDto,
    responses(
        (status = 200, description = "Organization created", body = ApiResponse<OrganizationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Super admin access required"),
        (status = 409, description = "Code already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "organizations"
)]
pub async fn create_organization(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<OrganizationService>>,
    ValidatedJson(dto): ValidatedJson<CreateOrganizationDto>,
) -> Result<Json<ApiResponse<OrganizationResponseDto>>> {
    let organization = service.create(&dto).await?;
    Ok(Json(ApiResponse::success(
        Some(organization),
        Some("Organization created".to_string()),
        None,
    )))
}

/// List organizations (super admin only)
#[utoipa::path(
    get,
    path = "/api/organizations",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of organizations", body = ApiResponse<Vec<OrganizationResponseDto>>),
        (status = 403, description = "Forbidden - Super admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "organizations"
)]
pub async fn list_organizations(
    RequireSuperAdmin(_user): RequireSuperAdmin,
    State(service): State<Arc<OrganizationService>>,
    Query(page): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<OrganizationResponseDto>>>> {
    let (items, total) = service.list(page.offset(), page.limit()).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get organization by ID
#[utoipa::path(
    get,
    path = "/api/organizations/{id}",
    params(
        ("id" = Uuid, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Organization found", body = ApiResponse<OrganizationResponseDto>),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "organizations"
)]
pub async fn get_organization(
    user: AuthenticatedUser,
    State(service): State<Arc<OrganizationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrganizationResponseDto>>> {
    ensure_access(&user, id)?;
    let organization = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(organization), None, None)))
}

/// Organization health score over the last 30 days
#[utoipa::path(
    get,
    path = "/api/organizations/{id}/health",
    params(
        ("id" = Uuid, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Health score", body = ApiResponse<OrganizationHealthDto>),
        (status = 403, description = "Forbidden - Coordinator access required"),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "organizations"
)]
pub async fn get_organization_health(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<OrganizationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrganizationHealthDto>>> {
    ensure_access(&user, id)?;
    let health = service.health(id).await?;
    Ok(Json(ApiResponse::success(Some(health), None, None)))
}
