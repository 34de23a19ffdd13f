//! Webhook ingress and live event stream.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use actors::{DeliveryError, Relay, Subscriber, SubscriptionHandle};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{
        IntoResponse, Response,
        sse::{Event as SseEvent, Sse},
    },
    routing::{get, post},
};
use dispatch_core::{ConnectedMarker, JobEvent, StreamFrame};
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tower_http::cors::{Any, CorsLayer};

pub const EVENTS_PATH: &str = "/api/events";
pub const WEBHOOK_PATH: &str = "/api/events/webhook";

const WEBHOOK_ACCEPTED: &str = "Webhook received and event emitted.";
const WEBHOOK_FAILED: &str = "Error processing webhook";
const STREAM_FAILED: &str = "Live updates unavailable";

/// Body of every ingress response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub message: String,
}

impl WebhookAck {
    fn reply(status: StatusCode, message: &str) -> (StatusCode, Json<WebhookAck>) {
        (
            status,
            Json(WebhookAck {
                message: message.to_string(),
            }),
        )
    }
}

/// Routes for the ingress and egress endpoints, bound to `relay`.
pub fn event_routes(relay: Relay) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CACHE_CONTROL]);

    Router::new()
        .route(EVENTS_PATH, get(stream_events).layer(cors))
        .route(WEBHOOK_PATH, post(receive_webhook))
        .with_state(relay)
}

/// Accept one posted envelope and publish it.
///
/// The body is read raw so that every parse failure, including a wrong
/// content type, produces the same 500 reply and no publish.
async fn receive_webhook(State(relay): State<Relay>, body: Bytes) -> impl IntoResponse {
    let event: JobEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!("Error processing webhook: {}", e);
            return WebhookAck::reply(StatusCode::INTERNAL_SERVER_ERROR, WEBHOOK_FAILED);
        }
    };

    tracing::info!("Webhook received: {}", event.description());

    match relay.publish(event).await {
        Ok(report) => {
            tracing::debug!(
                "Event emitted to {} subscribers ({} failed)",
                report.delivered,
                report.failed
            );
            WebhookAck::reply(StatusCode::OK, WEBHOOK_ACCEPTED)
        }
        Err(e) => {
            tracing::error!("Error processing webhook: {}", e);
            WebhookAck::reply(StatusCode::INTERNAL_SERVER_ERROR, WEBHOOK_FAILED)
        }
    }
}

/// Forwards serialized events into one connection's outbound queue.
struct ConnectionSubscriber {
    tx: mpsc::UnboundedSender<String>,
}

impl Subscriber for ConnectionSubscriber {
    fn deliver(&self, event: &JobEvent) -> Result<(), DeliveryError> {
        let data =
            serde_json::to_string(event).map_err(|e| DeliveryError::Serialize(e.to_string()))?;
        self.tx.send(data).map_err(|_| DeliveryError::Closed)
    }
}

/// Removes the relay subscription when the response stream is dropped.
struct SubscriptionGuard {
    relay: Relay,
    handle: SubscriptionHandle,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        tracing::debug!("Client disconnected, releasing {}", self.handle);
        self.relay.unsubscribe_detached(self.handle);
    }
}

/// Outbound frames for one connection. Holds the subscription for as long
/// as the client stays connected.
struct EventStream {
    frames: UnboundedReceiverStream<String>,
    _guard: SubscriptionGuard,
}

impl Stream for EventStream {
    type Item = Result<SseEvent, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.frames)
            .poll_next(cx)
            .map(|frame| frame.map(|data| Ok(SseEvent::default().data(data))))
    }
}

/// Open a live stream: the connected marker first, then one frame per event.
async fn stream_events(State(relay): State<Relay>) -> Response {
    let marker = match StreamFrame::Connected(ConnectedMarker::new()).to_json() {
        Ok(marker) => marker,
        Err(e) => {
            tracing::error!("Failed to encode connection marker: {}", e);
            return WebhookAck::reply(StatusCode::INTERNAL_SERVER_ERROR, STREAM_FAILED)
                .into_response();
        }
    };

    let (tx, rx) = mpsc::unbounded_channel();
    // Queued before subscribing, so it always precedes the first event
    let _ = tx.send(marker);

    let handle = match relay.subscribe(Arc::new(ConnectionSubscriber { tx })).await {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Failed to open live stream: {}", e);
            return WebhookAck::reply(StatusCode::INTERNAL_SERVER_ERROR, STREAM_FAILED)
                .into_response();
        }
    };
    tracing::debug!("Client connected as {}", handle);

    let stream = EventStream {
        frames: UnboundedReceiverStream::new(rx),
        _guard: SubscriptionGuard { relay, handle },
    };

    (
        [
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (header::CONNECTION, HeaderValue::from_static("keep-alive")),
        ],
        Sse::new(stream),
    )
        .into_response()
}
