//! Inbound wiki webhooks
//!
//! BookStack posts an event whenever something happens on the wiki. New
//! pages are announced in the configured chat channel; everything else is
//! acknowledged and ignored.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::dice::{RandomSource, RngSource};
use crate::notify::Notification;
use crate::resources::{MessagePool, Resources};

pub const PAGE_CREATE_EVENT: &str = "page_create";

/// Shared webhook handler state
#[derive(Clone)]
pub struct WebhookState {
    resources: Arc<Resources>,
    notifications: mpsc::Sender<Notification>,
    channel_id: u64,
}

impl WebhookState {
    pub fn new(
        resources: Arc<Resources>,
        notifications: mpsc::Sender<Notification>,
        channel_id: u64,
    ) -> Self {
        Self {
            resources,
            notifications,
            channel_id,
        }
    }
}

/// BookStack webhook payload; only the fields we use
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub triggered_by: Option<Actor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub name: String,
}

/// Build the webhook router
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/webhooks/new_post", post(new_post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "boredbot",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<WebhookState>) -> impl IntoResponse {
    if state.notifications.is_closed() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                relay: "stopped",
            }),
        )
    } else {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                relay: "ok",
            }),
        )
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    relay: &'static str,
}

async fn new_post(
    State(state): State<WebhookState>,
    Json(event): Json<WebhookEvent>,
) -> impl IntoResponse {
    debug!("Webhook event: {:?}", event);

    if event.event != PAGE_CREATE_EVENT {
        info!("Received unhandled event type: {}", event.event);
        return (StatusCode::OK, "Webhook received");
    }

    let Some(author) = event.triggered_by else {
        warn!("page_create event without triggered_by");
        return (StatusCode::BAD_REQUEST, "Missing triggered_by");
    };

    let content = {
        let mut rng = RngSource::thread();
        new_page_message(
            &state.resources.new_post_messages,
            &author.name,
            event.url.as_deref(),
            &mut rng,
        )
    };

    let notification = Notification {
        channel_id: state.channel_id,
        content,
    };

    if state.notifications.send(notification).await.is_err() {
        warn!("Notification relay is gone, dropping page_create announcement");
        return (StatusCode::SERVICE_UNAVAILABLE, "Notification relay unavailable");
    }

    (StatusCode::OK, "Webhook received")
}

/// Announcement text for a newly created wiki page; the link line is
/// omitted when the event carried no URL
pub fn new_page_message(
    messages: &MessagePool,
    author: &str,
    url: Option<&str>,
    rng: &mut impl RandomSource,
) -> String {
    let mut message = format!("{} It's author is **{}**!", messages.choose(rng), author);
    if let Some(url) = url {
        message.push('\n');
        message.push_str(url);
    }
    message
}
