use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature (auth middleware applied by caller)
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/nearby", get(handlers::nearby_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::audit_logs::repositories::MemoryAuditLogRepository;
    use crate::features::audit_logs::AuditLogService;
    use crate::features::notifications::NotificationHub;
    use crate::features::reports::dtos::{NearbyReportDto, ReportResponseDto};
    use crate::features::reports::repositories::MemoryReportRepository;
    use crate::shared::test_helpers::{create_user, with_user};
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    fn service() -> Arc<ReportService> {
        Arc::new(ReportService::new(
            Arc::new(MemoryReportRepository::new()),
            Arc::new(AuditLogService::new(Arc::new(MemoryAuditLogRepository::new()))),
            Arc::new(NotificationHub::new(16)),
        ))
    }

    fn body(lat: f64, lon: f64) -> serde_json::Value {
        json!({
            "title": "Flooded road",
            "description": "Water up to knee level near the market",
            "severity": "high",
            "latitude": lat,
            "longitude": lon
        })
    }

    #[tokio::test]
    async fn test_create_and_search_nearby() {
        let org = Uuid::new_v4();
        let service = service();
        let server = TestServer::new(with_user(
            routes(service),
            create_user(&["responder"], Some(org)),
        ))
        .unwrap();

        let created = server.post("/api/reports").json(&body(10.30, 123.89)).await;
        created.assert_status_ok();
        let report = created
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();
        assert_eq!(report.organization_id, Some(org));

        let response = server
            .get("/api/reports/nearby")
            .add_query_param("lat", 10.31)
            .add_query_param("lon", 123.89)
            .add_query_param("radius_km", 5)
            .await;
        response.assert_status_ok();
        let nearby = response
            .json::<ApiResponse<Vec<NearbyReportDto>>>()
            .data
            .unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].report.id, report.id);
    }

    #[tokio::test]
    async fn test_nearby_rejects_oversized_radius() {
        let server = TestServer::new(with_user(
            routes(service()),
            create_user(&["responder"], Some(Uuid::new_v4())),
        ))
        .unwrap();

        let response = server
            .get("/api/reports/nearby")
            .add_query_param("lat", 0)
            .add_query_param("lon", 0)
            .add_query_param("radius_km", 501)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_validates_body() {
        let server = TestServer::new(with_user(
            routes(service()),
            create_user(&[], None),
        ))
        .unwrap();

        let response = server
            .post("/api/reports")
            .json(&json!({
                "title": "x",
                "description": "",
                "latitude": 0.0,
                "longitude": 0.0
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_responder_cannot_change_status() {
        let org = Uuid::new_v4();
        let service = service();
        let responder = create_user(&["responder"], Some(org));
        let server = TestServer::new(with_user(routes(service), responder)).unwrap();

        let report = server
            .post("/api/reports")
            .json(&body(1.0, 1.0))
            .await
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();

        let response = server
            .patch(&format!("/api/reports/{}/status", report.id))
            .json(&json!({ "status": "verified" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }
}
