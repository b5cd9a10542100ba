//! REST endpoints for the conversation history.
//!
//! Each endpoint is one user action: it takes the session lock, performs a
//! single session call, and returns the result. Clients re-fetch the list or
//! page after a change.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::conversation::{EXPORT_FILE_NAME, MessagePatch};
use crate::error::{Result, ValidationError};
use crate::session::Session;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single session. The lock puts concurrent requests in arrival order.
    pub session: Arc<Mutex<Session>>,
    /// Where `POST /api/snapshot` writes its copies.
    pub snapshot_dir: PathBuf,
}

impl AppState {
    pub fn new(session: Session, snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            snapshot_dir: snapshot_dir.into(),
        }
    }
}

/// Build the Axum router with the history REST routes.
pub fn history_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/messages", get(list_messages).post(create_message))
        .route(
            "/api/messages/{id}",
            get(get_message).put(edit_message).delete(delete_message),
        )
        .route("/api/page", get(get_page))
        .route("/api/page/next", post(next_page))
        .route("/api/page/previous", post(previous_page))
        .route("/api/export", get(export_csv))
        .route("/api/snapshot", post(create_snapshot))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "convo-history"
    }))
}

// ── Messages ────────────────────────────────────────────────────────────

async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let messages = state.session.lock().await.messages().await?;
    Ok(Json(messages))
}

async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse> {
    let message = state.session.lock().await.get(id).await?;
    Ok(Json(message))
}

#[derive(Deserialize)]
struct NewMessage {
    sender: String,
    #[serde(default)]
    content: String,
}

async fn create_message(
    State(state): State<AppState>,
    Json(body): Json<NewMessage>,
) -> Result<impl IntoResponse> {
    if body.sender.trim().is_empty() {
        return Err(ValidationError::Blank { field: "sender" }.into());
    }
    let message = state
        .session
        .lock()
        .await
        .add(body.sender, body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn edit_message(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<MessagePatch>,
) -> Result<impl IntoResponse> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch.into());
    }
    if patch.sender.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(ValidationError::Blank { field: "sender" }.into());
    }
    let message = state.session.lock().await.edit(id, patch).await?;
    Ok(Json(message))
}

async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse> {
    state.session.lock().await.delete(id).await?;
    Ok(Json(serde_json::json!({"status": "deleted", "id": id})))
}

// ── Paging ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PageQuery {
    page: Option<i64>,
}

async fn get_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let page = match query.page {
        Some(requested) => session.go_to_page(requested).await?,
        None => session.view().await?,
    };
    Ok(Json(page))
}

async fn next_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let page = state.session.lock().await.next_page().await?;
    Ok(Json(page))
}

async fn previous_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let page = state.session.lock().await.previous_page().await?;
    Ok(Json(page))
}

// ── Export ──────────────────────────────────────────────────────────────

async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let csv = state.session.lock().await.export_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    ))
}

async fn create_snapshot(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let path = state
        .session
        .lock()
        .await
        .snapshot(&state.snapshot_dir)
        .await?;
    info!(path = %path.display(), "Snapshot requested");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"path": path.display().to_string()})),
    ))
}
