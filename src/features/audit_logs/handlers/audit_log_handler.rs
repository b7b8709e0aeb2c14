use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::audit_logs::dtos::{AuditLogQueryParams, AuditLogResponseDto};
use crate::features::audit_logs::models::AuditLogFilter;
use crate::features::audit_logs::services::AuditLogService;
use crate::features::auth::guards::RequireOrgAdmin;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List audit log entries (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(AuditLogQueryParams),
    responses(
        (status = 200, description = "List of audit log entries", body = ApiResponse<Vec<AuditLogResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Organization admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_audit_logs(
    RequireOrgAdmin(user): RequireOrgAdmin,
    State(service): State<Arc<AuditLogService>>,
    Query(params): Query<AuditLogQueryParams>,
) -> Result<Json<ApiResponse<Vec<AuditLogResponseDto>>>> {
    let organization_id = user.scoped_organization(params.organization_id)?;

    let filter = AuditLogFilter {
        organization_id,
        actor_id: params.actor_id,
        entity_type: params.entity_type,
        entity_id: params.entity_id,
    };
    let page = PaginationQuery::new(params.page, params.page_size);

    let (items, total) = service
        .list(&filter, page.offset(), page.limit())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}
