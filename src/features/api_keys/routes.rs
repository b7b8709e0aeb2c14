use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::api_keys::handlers;
use crate::features::api_keys::services::ApiKeyService;

/// Create admin API key routes (nested under /api/admin)
pub fn admin_routes(service: Arc<ApiKeyService>) -> Router {
    Router::new()
        .route(
            "/api-keys",
            get(handlers::list_api_keys).post(handlers::create_api_key),
        )
        .route("/api-keys/{id}", delete(handlers::revoke_api_key))
        .with_state(service)
}
