use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::core::error::Result;
use crate::features::auth::guards::RequireOrgAdmin;
use crate::features::export::models::{ExportFile, ExportQuery};
use crate::features::export::services::ExportService;

fn attachment(file: ExportFile) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.body,
    )
}

/// Export assignments as CSV or JSON
#[utoipa::path(
    get,
    path = "/api/admin/export/assignments",
    params(ExportQuery),
    responses(
        (status = 200, description = "Assignment export file", content(("text/csv"), ("application/json"))),
        (status = 400, description = "Unknown format"),
        (status = 403, description = "Forbidden - Organization admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_assignments(
    RequireOrgAdmin(user): RequireOrgAdmin,
    State(service): State<Arc<ExportService>>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse> {
    let organization_id = user.scoped_organization(query.organization_id)?;
    let file = service
        .export_assignments(&user, organization_id, query.format)
        .await?;
    Ok(attachment(file))
}

/// Export reports as CSV or JSON
#[utoipa::path(
    get,
    path = "/api/admin/export/reports",
    params(ExportQuery),
    responses(
        (status = 200, description = "Report export file", content(("text/csv"), ("application/json"))),
        (status = 400, description = "Unknown format"),
        (status = 403, description = "Forbidden - Organization admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_reports(
    RequireOrgAdmin(user): RequireOrgAdmin,
    State(service): State<Arc<ExportService>>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse> {
    let organization_id = user.scoped_organization(query.organization_id)?;
    let file = service
        .export_reports(&user, organization_id, query.format)
        .await?;
    Ok(attachment(file))
}
