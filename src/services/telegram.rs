use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::telegram::{ApiResponse, SendMessageRequest, SetWebhookRequest};

/// Thin Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(client: Client, api_url: String, token: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    // The token is part of the path, so method URLs must never be logged.
    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("Calling Telegram method {}", method);

        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        // Telegram answers with the same envelope on 4xx, so read it regardless of status
        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(AppError::Telegram(format!("{} failed: {}", method, description)));
        }

        envelope
            .result
            .ok_or_else(|| AppError::Telegram(format!("{} returned no result", method)))
    }

    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> AppResult<()> {
        tracing::info!("Registering Telegram webhook at {}", url);
        let _: bool = self
            .call("setWebhook", &SetWebhookRequest { url, secret_token })
            .await?;
        Ok(())
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
        let _: Value = self
            .call("sendMessage", &SendMessageRequest { chat_id, text })
            .await?;
        Ok(())
    }
}
