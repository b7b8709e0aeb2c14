use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::{RequireCoordinator, RequireResponder};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateReportDto, NearbyReportDto, NearbyReportsQuery, ReportQueryParams, ReportResponseDto,
    UpdateReportStatusDto,
};
use crate::features::reports::models::ReportFilter;
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Submit a report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 200, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    ValidatedJson(dto): ValidatedJson<CreateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.create(&user, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(report),
        Some("Report submitted".to_string()),
        None,
    )))
}

/// List reports of the caller's organization (paginated)
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportQueryParams),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<ReportService>>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let filter = ReportFilter {
        organization_id: user.scoped_organization(params.organization_id)?,
        status: params.status,
        severity: params.severity,
        kind: params.kind,
    };
    let page = PaginationQuery::new(params.page, params.page_size);

    let (items, total) = service.list(&filter, page.offset(), page.limit()).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Reports within a radius of a point, nearest first
#[utoipa::path(
    get,
    path = "/api/reports/nearby",
    params(NearbyReportsQuery),
    responses(
        (status = 200, description = "Reports inside the radius", body = ApiResponse<Vec<NearbyReportDto>>),
        (status = 400, description = "Invalid coordinates or radius"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn nearby_reports(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<ReportService>>,
    Query(query): Query<NearbyReportsQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyReportDto>>>> {
    let filter = ReportFilter {
        organization_id: user.scoped_organization(None)?,
        status: query.status,
        severity: query.severity,
        kind: None,
    };

    let items = service
        .within_radius(query.lat, query.lon, query.radius_km, &filter)
        .await?;
    let total = items.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Update report status (coordinator or above)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Coordinator access required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Transition not allowed from the current status")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.update_status(&user, id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(report),
        Some("Report status updated".to_string()),
        None,
    )))
}
