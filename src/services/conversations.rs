use reqwest::Client;

use crate::errors::{AppError, AppResult};
use crate::models::conversation::Conversation;

/// Read-only client for the remote Conversations API.
#[derive(Debug, Clone)]
pub struct ConversationsClient {
    client: Client,
    base_url: String,
}

impl ConversationsClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // One request per call; failures are returned as-is and never retried
    pub async fn list(&self) -> AppResult<Vec<Conversation>> {
        let url = format!("{}/api/conversations", self.base_url);
        tracing::info!("Fetching conversations from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Conversations API answered {}", status);
            return Err(AppError::UpstreamStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let conversations: Vec<Conversation> = serde_json::from_slice(&body)?;

        tracing::info!("✅ Retrieved {} conversations", conversations.len());
        Ok(conversations)
    }

    pub async fn get(&self, id: i64) -> AppResult<Conversation> {
        self.list()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Conversation {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn conversation(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "externalId": format!("54922100000{}", id),
            "channel": "telegram",
            "status": "active",
            "collectedData": {},
            "token": "yaturno_x",
            "userName": "Ana",
            "createdAt": "2026-10-01T10:00:00Z",
            "updatedAt": "2026-10-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_keeps_upstream_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([conversation(3), conversation(1)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ConversationsClient::new(Client::new(), format!("{}/", server.uri()));
        let conversations = client.list().await.unwrap();
        let ids: Vec<i64> = conversations.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = ConversationsClient::new(Client::new(), server.uri());
        let err = client.list().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch (500)");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = ConversationsClient::new(Client::new(), server.uri());
        assert!(matches!(client.list().await, Err(AppError::Json(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/conversations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([conversation(1)])))
            .mount(&server)
            .await;

        let client = ConversationsClient::new(Client::new(), server.uri());
        assert_eq!(client.get(1).await.unwrap().user_name, "Ana");
        assert!(matches!(client.get(2).await, Err(AppError::NotFound(_))));
    }
}
