use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::operations::handlers;
use crate::features::operations::services::OperationService;

/// Create routes for operations, their teams and daily logs
pub fn routes(service: Arc<OperationService>) -> Router {
    Router::new()
        .route(
            "/api/operations",
            get(handlers::list_operations).post(handlers::create_operation),
        )
        .route(
            "/api/operations/{id}",
            get(handlers::get_operation).patch(handlers::update_operation),
        )
        .route(
            "/api/operations/{id}/reports",
            get(handlers::list_operation_reports),
        )
        .route("/api/operations/{id}/members", get(handlers::list_members))
        .route(
            "/api/operations/{id}/members/{user_id}",
            delete(handlers::remove_member),
        )
        .route(
            "/api/operations/{id}/invitations",
            get(handlers::list_operation_invitations).post(handlers::invite_member),
        )
        .route(
            "/api/operations/{id}/invitations/{invitation_id}",
            delete(handlers::revoke_invitation),
        )
        .route(
            "/api/operations/{id}/daily-logs",
            get(handlers::list_daily_logs).post(handlers::create_daily_log),
        )
        .route("/api/my-invitations", get(handlers::list_my_invitations))
        .route(
            "/api/my-invitations/{id}/accept",
            post(handlers::accept_invitation),
        )
        .route(
            "/api/my-invitations/{id}/decline",
            post(handlers::decline_invitation),
        )
        .with_state(service)
}
