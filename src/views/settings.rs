use serde::Serialize;
use serde_json::Value;

use crate::errors::AppResult;
use crate::utils::config::Config;

pub const ONBOARDING_DEFINITION_FILE: &str = "appointment-scheduling.json";

const ONBOARDING_DEFINITION: &str = include_str!("../../assets/appointment-scheduling.json");

const SECRET_MASK: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub webhook: WebhookSettings,
    pub channels: Vec<ChannelSetting>,
    pub onboarding_definition: OnboardingDefinition,
}

#[derive(Debug, Serialize)]
pub struct WebhookSettings {
    pub target_url: String,
    pub secret: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChannelSetting {
    pub name: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct OnboardingDefinition {
    pub file_name: &'static str,
    pub read_only: bool,
    pub document: Value,
}

impl SettingsView {
    pub fn build(config: &Config, reveal_secret: bool) -> AppResult<Self> {
        let secret = if reveal_secret {
            config.settings_webhook_secret.clone()
        } else {
            SECRET_MASK.to_string()
        };

        Ok(Self {
            webhook: WebhookSettings {
                target_url: config.settings_webhook_target.clone(),
                secret,
                status: "Active",
            },
            channels: vec![
                ChannelSetting {
                    name: "WhatsApp",
                    enabled: true,
                },
                ChannelSetting {
                    name: "Telegram",
                    enabled: true,
                },
            ],
            onboarding_definition: OnboardingDefinition {
                file_name: ONBOARDING_DEFINITION_FILE,
                read_only: true,
                document: serde_json::from_str(ONBOARDING_DEFINITION)?,
            },
        })
    }
}
