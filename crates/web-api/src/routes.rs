use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use application::{MessageLimit, PostMessageRequest, UpdateMessageRequest};
use domain::{Message, Participant, Sequence};

use crate::{error::ApiError, state::AppState};

/// 请求方自报的参与者名称
pub const USER_HEADER: &str = "user";

#[derive(Debug, Deserialize)]
struct JoinPayload {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    to: String,
    #[serde(default)]
    text: String,
    #[serde(default, rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ReadQuery {
    limit: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/participants", post(join).get(list_participants))
        .route("/messages", post(post_message).get(read_messages))
        .route(
            "/messages/{sequence}",
            delete(delete_message).put(update_message),
        )
        .route("/status", post(heartbeat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn user_from(headers: &HeaderMap) -> String {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn join(
    State(state): State<AppState>,
    Json(payload): Json<JoinPayload>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let participant = state.participant_service.join(payload.name).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    Ok(Json(state.participant_service.list().await?))
}

async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MessagePayload>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = state
        .message_service
        .post(PostMessageRequest {
            sender: user_from(&headers),
            to: payload.to,
            text: payload.text,
            kind: payload.kind,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

async fn read_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReadQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let limit = MessageLimit::parse(query.limit.as_deref());
    let messages = state
        .message_service
        .read(&user_from(&headers), limit)
        .await?;

    Ok(Json(messages))
}

async fn heartbeat(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .participant_service
        .heartbeat(&user_from(&headers))
        .await?;
    Ok(StatusCode::OK)
}

async fn delete_message(
    State(state): State<AppState>,
    Path(sequence): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .message_service
        .delete(Sequence(sequence), &user_from(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_message(
    State(state): State<AppState>,
    Path(sequence): Path<u64>,
    headers: HeaderMap,
    Json(payload): Json<MessagePayload>,
) -> Result<Json<Message>, ApiError> {
    let message = state
        .message_service
        .update(UpdateMessageRequest {
            sequence: Sequence(sequence),
            owner: user_from(&headers),
            to: payload.to,
            text: payload.text,
            kind: payload.kind,
        })
        .await?;

    Ok(Json(message))
}
