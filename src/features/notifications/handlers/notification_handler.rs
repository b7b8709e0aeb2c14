use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::services::NotificationHub;

/// State for notification handlers
#[derive(Clone)]
pub struct NotificationState {
    pub hub: Arc<NotificationHub>,
    pub keep_alive: Duration,
}

/// Subscribe to real-time notifications addressed to the caller
#[utoipa::path(
    get,
    path = "/api/notifications/stream",
    responses(
        (status = 200, description = "SSE stream of notification events", content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn stream_notifications(
    user: AuthenticatedUser,
    State(state): State<NotificationState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let receiver = state.hub.subscribe();
    tracing::info!(
        user_id = %user.user_id,
        subscribers = state.hub.subscriber_count(),
        "Notification stream opened"
    );

    let stream = BroadcastStream::new(receiver).filter_map(move |item| match item {
        Ok(event) if event.is_visible_to(&user) => Some(
            Event::default()
                .event(event.kind.as_str())
                .id(event.id.to_string())
                .json_data(event.as_ref()),
        ),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "Notification subscriber lagged");
            Some(Ok(Event::default()
                .event("lagged")
                .data(skipped.to_string())))
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(state.keep_alive))
}
