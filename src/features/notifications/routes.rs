use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};

use crate::features::notifications::handlers::{self, NotificationState};
use crate::features::notifications::services::NotificationHub;

/// Create routes for the notifications feature
///
/// Note: This feature requires authentication
pub fn routes(hub: Arc<NotificationHub>, keep_alive: Duration) -> Router {
    let state = NotificationState { hub, keep_alive };

    Router::new()
        .route(
            "/api/notifications/stream",
            get(handlers::stream_notifications),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::models::{NotificationEvent, NotificationKind};
    use crate::shared::test_helpers::{create_user, with_user};
    use axum::body::{Body, BodyDataStream};
    use axum::http::{header, Request, StatusCode};
    use futures::StreamExt;
    use serde_json::json;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn open_stream(hub: Arc<NotificationHub>, user_id: Uuid) -> BodyDataStream {
        let mut user = create_user(&["responder"], Some(Uuid::new_v4()));
        user.user_id = user_id;
        let app = with_user(routes(hub, Duration::from_secs(60)), user);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/notifications/stream")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));
        response.into_body().into_data_stream()
    }

    async fn next_frame(body: &mut BodyDataStream) -> Option<String> {
        match tokio::time::timeout(Duration::from_millis(200), body.next()).await {
            Ok(Some(chunk)) => Some(String::from_utf8(chunk.unwrap().to_vec()).unwrap()),
            _ => None,
        }
    }

    fn event_for(user_id: Uuid) -> NotificationEvent {
        NotificationEvent::new(
            NotificationKind::AssignmentCreated,
            None,
            Uuid::new_v4(),
            json!({}),
        )
        .to_user(user_id)
    }

    #[tokio::test]
    async fn test_stream_only_delivers_own_events() {
        let hub = Arc::new(NotificationHub::new(16));
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let mut body = open_stream(hub.clone(), alice).await;

        let for_bob = event_for(bob);
        let bob_entity = for_bob.entity_id;
        let for_alice = event_for(alice);
        let alice_entity = for_alice.entity_id;
        hub.publish(for_bob);
        hub.publish(for_alice);

        let frame = next_frame(&mut body).await.unwrap();
        assert!(frame.contains("event: assignment.created"));
        assert!(frame.contains(&alice_entity.to_string()));
        assert!(!frame.contains(&bob_entity.to_string()));
        assert!(next_frame(&mut body).await.is_none());
    }

    #[tokio::test]
    async fn test_slow_stream_gets_lagged_event() {
        let hub = Arc::new(NotificationHub::new(2));
        let alice = Uuid::new_v4();
        let mut body = open_stream(hub.clone(), alice).await;

        for _ in 0..5 {
            hub.publish(event_for(alice));
        }

        let frame = next_frame(&mut body).await.unwrap();
        assert!(frame.contains("event: lagged"));
        assert!(frame.contains("data: 3"));

        // Delivery resumes with the events still buffered
        let frame = next_frame(&mut body).await.unwrap();
        assert!(frame.contains("event: assignment.created"));
    }
}
