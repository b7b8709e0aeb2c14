use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::organizations::handlers;
use crate::features::organizations::services::OrganizationService;

/// Create routes for organizations and their health score
pub fn routes(service: Arc<OrganizationService>) -> Router {
    Router::new()
        .route(
            "/api/organizations",
            get(handlers::list_organizations).post(handlers::create_organization),
        )
        .route("/api/organizations/{id}", get(handlers::get_organization))
        .route(
            "/api/organizations/{id}/health",
            get(handlers::get_organization_health),
        )
        .with_state(service)
}
