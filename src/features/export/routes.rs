use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::export::handlers;
use crate::features::export::services::ExportService;

/// Create admin export routes (nested under /api/admin)
pub fn admin_routes(service: Arc<ExportService>) -> Router {
    Router::new()
        .route("/export/assignments", get(handlers::export_assignments))
        .route("/export/reports", get(handlers::export_reports))
        .with_state(service)
}
