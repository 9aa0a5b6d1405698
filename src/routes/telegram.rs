use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use crate::errors::{AppError, AppResult};
use crate::models::telegram::Update;
use crate::services::bot::EchoBot;
use crate::utils::config::{AppState, WEBHOOK_PATH};

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

fn bot(app_state: &AppState) -> AppResult<&EchoBot> {
    app_state
        .bot
        .as_ref()
        .ok_or_else(|| AppError::Config("TELEGRAM_BOT_TOKEN is not set".to_string()))
}

// Inbound update from Telegram, handed to the bot unchanged
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> AppResult<StatusCode> {
    let bot = bot(&app_state)?;

    if let Some(expected) = &app_state.config.telegram_webhook_secret {
        let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            tracing::warn!("Rejected update {}: bad webhook secret", update.update_id);
            return Err(AppError::Unauthorized);
        }
    }

    tracing::info!("Received Telegram update {}", update.update_id);

    // a 5xx here makes Telegram redeliver the update
    bot.handle_update(&update).await.map_err(|e| {
        tracing::error!("❌ Failed to handle update {}: {}", update.update_id, e);
        e
    })?;

    Ok(StatusCode::OK)
}

// Register this relay's public URL with Telegram
pub async fn setup_handler(State(app_state): State<AppState>) -> AppResult<Json<Value>> {
    let bot = bot(&app_state)?;
    let webhook = app_state.config.webhook_endpoint()?;

    bot.telegram()
        .set_webhook(&webhook, app_state.config.telegram_webhook_secret.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("❌ Failed to register webhook: {}", e);
            e
        })?;

    tracing::info!("✅ Webhook registered at {}", webhook);
    Ok(Json(json!({
        "status": "ok",
        "webhook": webhook
    })))
}

pub fn create_telegram_router() -> Router<AppState> {
    Router::new()
        .route(WEBHOOK_PATH, post(webhook_handler))
        .route("/telegram/setup", get(setup_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::Config;
    use axum::http::HeaderValue;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state(server: &MockServer, secret: Option<&str>) -> AppState {
        AppState::new(Config {
            telegram_bot_token: Some("T".to_string()),
            telegram_api_url: server.uri(),
            telegram_webhook_secret: secret.map(str::to_string),
            webhook_url: Some("https://relay.example.com".to_string()),
            ..Config::default()
        })
        .unwrap()
    }

    fn text_update(text: &str) -> Update {
        serde_json::from_value(json!({
            "update_id": 100,
            "message": {"message_id": 1, "chat": {"id": 7}, "text": text}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_webhook_echoes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botT/sendMessage"))
            .and(body_json(json!({"chat_id": 7, "text": "Received: ping"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let status = webhook_handler(State(state(&server, None)), HeaderMap::new(), Json(text_update("ping")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_webhook_failed_reply_is_5xx() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botT/sendMessage"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&server)
            .await;

        let err = webhook_handler(State(state(&server, None)), HeaderMap::new(), Json(text_update("ping")))
            .await
            .unwrap_err();
        assert!(err.status_code().is_server_error());
    }

    #[tokio::test]
    async fn test_webhook_checks_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
            .expect(1)
            .mount(&server)
            .await;
        let app_state = state(&server, Some("s3"));

        let err = webhook_handler(State(app_state.clone()), HeaderMap::new(), Json(text_update("a")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        let mut headers = HeaderMap::new();
        headers.insert(SECRET_HEADER, HeaderValue::from_static("s3"));
        let status = webhook_handler(State(app_state), headers, Json(text_update("b")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_setup_registers_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botT/setWebhook"))
            .and(body_json(json!({"url": "https://relay.example.com/telegram/webhook"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .expect(1)
            .mount(&server)
            .await;

        let Json(body) = setup_handler(State(state(&server, None))).await.unwrap();
        assert_eq!(
            body,
            json!({"status": "ok", "webhook": "https://relay.example.com/telegram/webhook"})
        );
    }

    #[tokio::test]
    async fn test_missing_token() {
        let app_state = AppState::new(Config::default()).unwrap();
        let err = setup_handler(State(app_state)).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
