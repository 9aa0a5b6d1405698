use crate::errors::AppResult;
use crate::models::telegram::Update;
use crate::services::telegram::TelegramClient;

/// Replies to every text message with `Received: <text>`.
#[derive(Clone)]
pub struct EchoBot {
    telegram: TelegramClient,
}

impl EchoBot {
    pub fn new(telegram: TelegramClient) -> Self {
        Self { telegram }
    }

    pub fn telegram(&self) -> &TelegramClient {
        &self.telegram
    }

    pub async fn handle_update(&self, update: &Update) -> AppResult<()> {
        let Some(message) = &update.message else {
            tracing::debug!("Ignoring update {} without a message", update.update_id);
            return Ok(());
        };
        let Some(text) = message.text.as_deref() else {
            tracing::debug!("Ignoring non-text message {}", message.message_id);
            return Ok(());
        };

        let sender = message
            .from
            .as_ref()
            .and_then(|user| user.first_name.as_deref())
            .unwrap_or("unknown sender");
        tracing::info!(
            "Echoing message {} from {} in chat {}",
            message.message_id,
            sender,
            message.chat.id
        );
        self.telegram
            .send_message(message.chat.id, &format!("Received: {}", text))
            .await
    }
}
