use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::connection::ProbeOutcome;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeRequest {
    pub phone: String,
    pub user_name: String,
    pub token: String,
}

/// Client for the WhatsApp bridge: connection probe and test nudges.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: Client,
    base_url: String,
}

impl WhatsAppClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Probe the QR endpoint. Never fails: errors map to `ProbeOutcome::Failed`.
    pub async fn probe(&self) -> ProbeOutcome {
        match self.check_connection().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("WhatsApp status probe failed: {}", e);
                ProbeOutcome::Failed
            }
        }
    }

    async fn check_connection(&self) -> AppResult<ProbeOutcome> {
        let url = format!("{}/api/whatsapp/qr", self.base_url);
        let response = self.client.get(&url).send().await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        if is_json {
            let body: Value = response.json().await?;
            if body.get("status").and_then(Value::as_str) == Some("connected") {
                return Ok(ProbeOutcome::Connected);
            }
        }

        // anything else means the QR page is still being served
        Ok(ProbeOutcome::QrDisplayed)
    }

    pub async fn send_nudge(&self, nudge: &NudgeRequest) -> AppResult<()> {
        let url = format!("{}/api/nudge", self.base_url);
        tracing::info!("Sending test nudge to {}", nudge.phone);

        let response = self.client.post(&url).json(nudge).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus(status.as_u16()));
        }

        tracing::info!("✅ Nudge sent to {}", nudge.phone);
        Ok(())
    }
}
