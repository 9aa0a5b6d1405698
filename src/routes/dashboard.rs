use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppResult;
use crate::models::connection::ConnectionStatus;
use crate::routes::auth::RequireSession;
use crate::services::poller::CONNECTED_NOTICE;
use crate::services::whatsapp::NudgeRequest;
use crate::utils::config::AppState;
use crate::views::conversations::{list_rows, ConversationDetail, EMPTY_STATE};
use crate::views::overview::Overview;
use crate::views::settings::SettingsView;

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub reveal_secret: Option<bool>,
}

// Stats and the five most recently updated conversations
pub async fn overview_handler(
    State(app_state): State<AppState>,
    _session: RequireSession,
) -> AppResult<Json<Value>> {
    tracing::info!("Building dashboard overview");

    let conversations = app_state.conversations.list().await.map_err(|e| {
        tracing::error!("❌ Failed to fetch conversations: {}", e);
        e
    })?;
    let overview = Overview::from_conversations(&conversations);

    Ok(Json(json!({
        "success": true,
        "message": "Overview retrieved successfully",
        "data": overview
    })))
}

pub async fn conversations_handler(
    State(app_state): State<AppState>,
    _session: RequireSession,
) -> AppResult<Json<Value>> {
    tracing::info!("Fetching conversation list");

    let conversations = app_state.conversations.list().await.map_err(|e| {
        tracing::error!("❌ Failed to fetch conversations: {}", e);
        e
    })?;
    let rows = list_rows(&conversations, Utc::now());

    let message = if rows.is_empty() {
        EMPTY_STATE
    } else {
        "Conversations retrieved successfully"
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
        "data": rows,
        "count": rows.len()
    })))
}

pub async fn conversation_detail_handler(
    State(app_state): State<AppState>,
    _session: RequireSession,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    tracing::info!("Fetching conversation {}", id);

    let conversation = app_state.conversations.get(id).await.map_err(|e| {
        tracing::error!("❌ Failed to load conversation {}: {}", id, e);
        e
    })?;

    Ok(Json(json!({
        "success": true,
        "message": "Conversation retrieved successfully",
        "data": ConversationDetail::from_conversation(&conversation)
    })))
}

pub async fn whatsapp_status_handler(
    State(app_state): State<AppState>,
    _session: RequireSession,
) -> Json<Value> {
    let (status, polling) = match &app_state.status_poller {
        Some(poller) => (poller.status(), !poller.is_finished()),
        None => (ConnectionStatus::Loading, false),
    };

    let notice = status.is_terminal().then_some(CONNECTED_NOTICE);

    Json(json!({
        "success": true,
        "message": "WhatsApp status retrieved successfully",
        "data": {
            "status": status,
            "label": status.label(),
            "polling": polling,
            "notice": notice
        }
    }))
}

pub async fn nudge_handler(
    State(app_state): State<AppState>,
    _session: RequireSession,
    Json(payload): Json<NudgeRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match app_state.whatsapp.send_nudge(&payload).await {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "message": "Nudge sent successfully"
        }))),
        Err(e) => {
            tracing::error!("❌ Failed to send nudge to {}: {}", payload.phone, e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "success": false,
                    "message": "Failed to send nudge"
                })),
            ))
        }
    }
}

pub async fn settings_handler(
    State(app_state): State<AppState>,
    _session: RequireSession,
    Query(params): Query<SettingsQuery>,
) -> AppResult<Json<Value>> {
    let view = SettingsView::build(&app_state.config, params.reveal_secret.unwrap_or(false))?;

    Ok(Json(json!({
        "success": true,
        "message": "Settings retrieved successfully",
        "data": view
    })))
}

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview_handler))
        .route("/conversations", get(conversations_handler))
        .route("/conversations/{id}", get(conversation_detail_handler))
        .route("/whatsapp/status", get(whatsapp_status_handler))
        .route("/whatsapp/nudge", post(nudge_handler))
        .route("/settings", get(settings_handler))
}
