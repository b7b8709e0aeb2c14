use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::assignments::handlers;
use crate::features::assignments::services::AssignmentService;

/// Create routes for the assignments feature (auth middleware applied by caller)
pub fn routes(service: Arc<AssignmentService>) -> Router {
    Router::new()
        .route(
            "/api/assignments",
            get(handlers::list_assignments).post(handlers::create_assignment),
        )
        .route("/api/assignments/stats", get(handlers::get_assignment_stats))
        .route("/api/assignments/{id}", get(handlers::get_assignment))
        .route(
            "/api/assignments/{id}/accept",
            post(handlers::accept_assignment),
        )
        .route("/api/assignments/{id}/start", post(handlers::start_assignment))
        .route(
            "/api/assignments/{id}/complete",
            post(handlers::complete_assignment),
        )
        .route(
            "/api/assignments/{id}/decline",
            post(handlers::decline_assignment),
        )
        .route(
            "/api/assignments/{id}/notes",
            patch(handlers::update_assignment_notes),
        )
        .route(
            "/api/assignments/{id}/priority",
            patch(handlers::update_assignment_priority),
        )
        .route("/api/my-assignments", get(handlers::list_my_assignments))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::assignments::dtos::{AssignmentResponseDto, AssignmentStatsDto};
    use crate::features::assignments::models::{AssignmentStatus, TransitionPolicy};
    use crate::features::assignments::repositories::MemoryAssignmentRepository;
    use crate::features::audit_logs::repositories::MemoryAuditLogRepository;
    use crate::features::audit_logs::AuditLogService;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::notifications::NotificationHub;
    use crate::features::reports::dtos::CreateReportDto;
    use crate::features::reports::repositories::MemoryReportRepository;
    use crate::features::reports::ReportService;
    use crate::shared::test_helpers::{create_user, with_user};
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    struct Harness {
        service: Arc<AssignmentService>,
        reports: Arc<ReportService>,
        coordinator: AuthenticatedUser,
        responder: AuthenticatedUser,
    }

    fn harness() -> Harness {
        let audit = Arc::new(AuditLogService::new(Arc::new(
            MemoryAuditLogRepository::new(),
        )));
        let hub = Arc::new(NotificationHub::new(16));
        let reports = Arc::new(ReportService::new(
            Arc::new(MemoryReportRepository::new()),
            audit.clone(),
            hub.clone(),
        ));
        let service = Arc::new(AssignmentService::new(
            Arc::new(MemoryAssignmentRepository::new()),
            reports.clone(),
            audit,
            hub,
            TransitionPolicy::default(),
        ));
        let org = Uuid::new_v4();
        Harness {
            service,
            reports,
            coordinator: create_user(&["coordinator"], Some(org)),
            responder: create_user(&["responder"], Some(org)),
        }
    }

    impl Harness {
        fn server_as(&self, user: &AuthenticatedUser) -> TestServer {
            TestServer::new(with_user(routes(self.service.clone()), user.clone())).unwrap()
        }

        async fn report_id(&self) -> Uuid {
            let dto = CreateReportDto {
                organization_id: None,
                kind: None,
                title: "Landslide".to_string(),
                description: "Road blocked by debris".to_string(),
                category: None,
                severity: None,
                latitude: -6.9,
                longitude: 107.6,
                address: None,
            };
            self.reports.create(&self.coordinator, &dto).await.unwrap().id
        }
    }

    #[tokio::test]
    async fn test_assignment_lifecycle_over_http() {
        let h = harness();
        let coordinator = h.server_as(&h.coordinator);
        let responder = h.server_as(&h.responder);

        let created = coordinator
            .post("/api/assignments")
            .json(&json!({
                "report_id": h.report_id().await,
                "responder_id": h.responder.user_id,
                "priority": "urgent"
            }))
            .await;
        created.assert_status_ok();
        let assignment = created
            .json::<ApiResponse<AssignmentResponseDto>>()
            .data
            .unwrap();

        let mine = responder
            .get("/api/my-assignments")
            .await
            .json::<ApiResponse<Vec<AssignmentResponseDto>>>();
        assert_eq!(mine.meta.unwrap().total, 1);

        for (action, expected) in [
            ("accept", AssignmentStatus::Accepted),
            ("start", AssignmentStatus::InProgress),
            ("complete", AssignmentStatus::Completed),
        ] {
            let response = responder
                .post(&format!("/api/assignments/{}/{}", assignment.id, action))
                .await;
            response.assert_status_ok();
            let body = response.json::<ApiResponse<AssignmentResponseDto>>();
            assert_eq!(body.data.unwrap().status, expected);
        }

        let stats = coordinator
            .get("/api/assignments/stats")
            .await
            .json::<ApiResponse<AssignmentStatsDto>>()
            .data
            .unwrap();
        assert_eq!(stats.completed, 1);
    }

    #[tokio::test]
    async fn test_invalid_transition_returns_conflict() {
        let h = harness();
        let coordinator = h.server_as(&h.coordinator);
        let responder = h.server_as(&h.responder);

        let assignment = coordinator
            .post("/api/assignments")
            .json(&json!({
                "report_id": h.report_id().await,
                "responder_id": h.responder.user_id
            }))
            .await
            .json::<ApiResponse<AssignmentResponseDto>>()
            .data
            .unwrap();

        let response = responder
            .post(&format!("/api/assignments/{}/start", assignment.id))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<ApiResponse<()>>();
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_responder_cannot_list_or_create() {
        let h = harness();
        let responder = h.server_as(&h.responder);

        responder
            .get("/api/assignments")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        responder
            .post("/api/assignments")
            .json(&json!({
                "report_id": Uuid::new_v4(),
                "responder_id": h.responder.user_id
            }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_decline_with_reason() {
        let h = harness();
        let coordinator = h.server_as(&h.coordinator);
        let responder = h.server_as(&h.responder);

        let assignment = coordinator
            .post("/api/assignments")
            .json(&json!({
                "report_id": h.report_id().await,
                "responder_id": h.responder.user_id
            }))
            .await
            .json::<ApiResponse<AssignmentResponseDto>>()
            .data
            .unwrap();

        let declined = responder
            .post(&format!("/api/assignments/{}/decline", assignment.id))
            .json(&json!({ "reason": "Vehicle broke down" }))
            .await
            .json::<ApiResponse<AssignmentResponseDto>>()
            .data
            .unwrap();
        assert_eq!(declined.status, AssignmentStatus::Declined);
        assert_eq!(declined.decline_reason.as_deref(), Some("Vehicle broke down"));
    }
}
