//! Admin/control HTTP API.
//!
//! | Method | Path | Effect |
//! |--------|------|--------|
//! | GET | `/health` | liveness |
//! | GET | `/` | topics, subscriptions, pending count, queues |
//! | DELETE | `/` | reset the context |
//! | POST | `/drain` | drain everything pending |
//! | POST | `/drain/:message_id` | drain one message |
//! | POST | `/topics` | create a topic |
//! | POST | `/topics/:name/subscriptions` | subscribe a queue or URL |
//! | POST | `/topics/:name/messages` | publish |
//! | POST | `/queues` | create a queue |
//! | GET | `/queues/:name/messages` | visible entries of a queue |

mod error;

pub use error::{ApiError, ErrorBody};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use fake_sns::{
    ContextSummary, DrainReport, MessageId, NotificationApi, Protocol, QueueEntry, SnsContext,
    Subscription, Target, Topic,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<SnsContext>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTopicRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub protocol: String,
    pub endpoint: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishRequest {
    pub message: String,
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishResponse {
    pub message_id: MessageId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQueueRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueueResponse {
    pub name: String,
    pub arn: String,
}

/// Build the admin router over `context`.
pub fn router(context: Arc<SnsContext>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(summary).delete(reset))
        .route("/drain", post(drain_all))
        .route("/drain/:message_id", post(drain_one))
        .route("/topics", post(create_topic))
        .route("/topics/:name/subscriptions", post(subscribe))
        .route("/topics/:name/messages", post(publish))
        .route("/queues", post(create_queue))
        .route("/queues/:name/messages", get(queue_messages))
        .with_state(AppState { context })
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "fake-sns",
        "version": fake_sns::VERSION
    }))
}

async fn summary(State(state): State<AppState>) -> Json<ContextSummary> {
    Json(state.context.summary())
}

async fn reset(State(state): State<AppState>) -> StatusCode {
    state.context.reset();
    StatusCode::NO_CONTENT
}

async fn drain_all(State(state): State<AppState>) -> Json<DrainReport> {
    Json(state.context.drain(None).await)
}

async fn drain_one(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Json<DrainReport> {
    Json(state.context.drain(Some(MessageId::new(message_id))).await)
}

async fn create_topic(
    State(state): State<AppState>,
    Json(request): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<Topic>), ApiError> {
    let topic = state.context.create_topic(&request.name).await?;
    info!(topic_arn = %topic.arn, "Topic created via admin API");
    Ok((StatusCode::CREATED, Json(topic)))
}

async fn subscribe(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    let topic_arn = state.context.topic_arn(&name)?;
    let protocol: Protocol = request.protocol.parse()?;
    let target = Target::from_protocol(protocol, &request.endpoint)?;

    let subscription = state.context.subscribe(&topic_arn, target).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

async fn publish(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, ApiError> {
    let topic_arn = state.context.topic_arn(&name)?;
    let message_id = state
        .context
        .publish_with_subject(&topic_arn, &request.message, request.subject)
        .await?;
    Ok(Json(PublishResponse { message_id }))
}

async fn create_queue(
    State(state): State<AppState>,
    Json(request): Json<CreateQueueRequest>,
) -> Result<(StatusCode, Json<QueueResponse>), ApiError> {
    state.context.create_queue(&request.name)?;
    let arn = state.context.queue_arn(&request.name);
    Ok((
        StatusCode::CREATED,
        Json(QueueResponse {
            name: request.name,
            arn,
        }),
    ))
}

async fn queue_messages(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<QueueEntry>>, ApiError> {
    Ok(Json(state.context.queues().entries(&name)?))
}
