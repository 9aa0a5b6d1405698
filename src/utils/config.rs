use reqwest::Client;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::errors::{AppError, AppResult};
use crate::services::auth::{SessionStore, StaticAuthenticator};
use crate::services::bot::EchoBot;
use crate::services::conversations::ConversationsClient;
use crate::services::poller::{PollerHandle, StatusPoller};
use crate::services::telegram::TelegramClient;
use crate::services::whatsapp::WhatsAppClient;

pub const WEBHOOK_PATH: &str = "/telegram/webhook";

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds on
    pub port: u16,

    /// Public base URL Telegram should deliver updates to
    pub webhook_url: Option<String>,

    pub telegram_bot_token: Option<String>,

    pub telegram_api_url: String,

    /// Shared secret Telegram echoes back in `X-Telegram-Bot-Api-Secret-Token`
    pub telegram_webhook_secret: Option<String>,

    /// Base URL of the Conversations API and WhatsApp bridge
    pub nudge_api_url: String,

    pub dashboard_email: Option<String>,
    pub dashboard_password: Option<String>,

    pub status_poll_interval: Duration,

    pub http_timeout: Duration,

    /// Where completed onboardings are delivered, shown read-only in settings
    pub settings_webhook_target: String,
    pub settings_webhook_secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            webhook_url: None,
            telegram_bot_token: None,
            telegram_api_url: "https://api.telegram.org".to_string(),
            telegram_webhook_secret: None,
            nudge_api_url: "https://ok-nudge.up.railway.app".to_string(),
            dashboard_email: None,
            dashboard_password: None,
            status_poll_interval: Duration::from_secs(5),
            http_timeout: Duration::from_secs(10),
            settings_webhook_target: "https://app.yaturno.com/api/webhooks/nudge".to_string(),
            settings_webhook_secret: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }

        config.webhook_url = get("WEBHOOK_URL");
        config.telegram_bot_token = get("TELEGRAM_BOT_TOKEN");
        config.telegram_webhook_secret = get("TELEGRAM_WEBHOOK_SECRET");
        config.dashboard_email = get("DASHBOARD_EMAIL");
        config.dashboard_password = get("DASHBOARD_PASSWORD");

        if let Some(api_url) = get("TELEGRAM_API_URL") {
            config.telegram_api_url = api_url;
        }

        if let Some(api_url) = get("NUDGE_API_URL") {
            config.nudge_api_url = api_url;
        }

        if let Some(seconds) = get("STATUS_POLL_INTERVAL_SECONDS").and_then(|s| s.parse::<u64>().ok()) {
            config.status_poll_interval = Duration::from_secs(seconds);
        }

        if let Some(seconds) = get("HTTP_TIMEOUT_SECONDS").and_then(|s| s.parse::<u64>().ok()) {
            config.http_timeout = Duration::from_secs(seconds);
        }

        if let Some(target) = get("SETTINGS_WEBHOOK_TARGET") {
            config.settings_webhook_target = target;
        }

        if let Some(secret) = get("SETTINGS_WEBHOOK_SECRET") {
            config.settings_webhook_secret = secret;
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("NUDGE_API_URL", self.nudge_api_url.as_str()),
            ("TELEGRAM_API_URL", self.telegram_api_url.as_str()),
        ] {
            Url::parse(value)
                .map_err(|e| AppError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }

        if let Some(webhook_url) = &self.webhook_url {
            Url::parse(webhook_url)
                .map_err(|e| AppError::Config(format!("WEBHOOK_URL is not a valid URL: {}", e)))?;
        }

        if self.status_poll_interval.is_zero() {
            return Err(AppError::Config(
                "STATUS_POLL_INTERVAL_SECONDS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The URL registered with Telegram: `<WEBHOOK_URL>/telegram/webhook`.
    pub fn webhook_endpoint(&self) -> AppResult<String> {
        let base = self
            .webhook_url
            .as_deref()
            .ok_or_else(|| AppError::Config("WEBHOOK_URL is not set".to_string()))?;
        Ok(format!("{}{}", base.trim_end_matches('/'), WEBHOOK_PATH))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub conversations: ConversationsClient,
    pub whatsapp: WhatsAppClient,
    pub bot: Option<EchoBot>,
    pub authenticator: Arc<StaticAuthenticator>,
    pub sessions: Arc<SessionStore>,
    pub status_poller: Option<Arc<PollerHandle>>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(format!("nudge/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let bot = config.telegram_bot_token.as_ref().map(|token| {
            EchoBot::new(TelegramClient::new(
                http.clone(),
                config.telegram_api_url.clone(),
                token.clone(),
            ))
        });

        let authenticator = StaticAuthenticator::new(
            config.dashboard_email.clone(),
            config.dashboard_password.clone(),
        );

        Ok(Self {
            conversations: ConversationsClient::new(http.clone(), config.nudge_api_url.clone()),
            whatsapp: WhatsAppClient::new(http, config.nudge_api_url.clone()),
            bot,
            authenticator: Arc::new(authenticator),
            sessions: Arc::new(SessionStore::default()),
            status_poller: None,
            config: Arc::new(config),
        })
    }

    /// Starts polling the WhatsApp bridge. Polling stops once the bridge
    /// reports a connection or when the last clone of the state is dropped.
    pub fn with_status_poller(mut self) -> Self {
        let poller = StatusPoller::new(self.whatsapp.clone(), self.config.status_poll_interval);
        self.status_poller = Some(Arc::new(poller.spawn()));
        self
    }
}
