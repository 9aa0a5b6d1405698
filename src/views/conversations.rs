use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::conversation::{Conversation, WorkingHoursEntry};
use crate::utils::format::{
    capitalize, display_number, display_value, format_ars, humanize_key, or_placeholder, relative_time,
};

pub const EMPTY_STATE: &str = "No conversations yet";

const DAY_ORDER: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Serialize)]
pub struct ConversationRow {
    pub id: i64,
    pub user_name: String,
    pub phone: String,
    pub business: String,
    pub business_type: String,
    pub status: &'static str,
    pub channel: &'static str,
    pub updated: String,
    pub updated_at: DateTime<Utc>,
}

impl ConversationRow {
    pub fn from_conversation(conversation: &Conversation, now: DateTime<Utc>) -> Self {
        let data = &conversation.collected_data;
        Self {
            id: conversation.id,
            user_name: conversation.user_name.clone(),
            phone: conversation.external_id.clone(),
            business: or_placeholder(data.business_name()),
            business_type: data
                .business_type()
                .filter(|t| !t.is_empty())
                .map(capitalize)
                .unwrap_or_else(|| or_placeholder(None)),
            status: conversation.status.as_str(),
            channel: conversation.channel.as_str(),
            updated: relative_time(conversation.updated_at, now),
            updated_at: conversation.updated_at,
        }
    }
}

pub fn list_rows(conversations: &[Conversation], now: DateTime<Utc>) -> Vec<ConversationRow> {
    conversations
        .iter()
        .map(|c| ConversationRow::from_conversation(c, now))
        .collect()
}

/// A labelled value; only built when the value is non-empty.
#[derive(Debug, Serialize, PartialEq)]
pub struct InfoField {
    pub label: String,
    pub value: String,
}

impl InfoField {
    pub fn new(label: impl Into<String>, value: Option<&str>) -> Option<Self> {
        let value = value.filter(|v| !v.is_empty())?;
        Some(Self {
            label: label.into(),
            value: value.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceLine {
    pub name: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct DayHours {
    pub day: String,
    pub enabled: bool,
    pub hours: String,
}

impl DayHours {
    fn new(day: &str, entry: &WorkingHoursEntry) -> Self {
        let hours = if entry.enabled {
            entry
                .ranges
                .iter()
                .map(|r| format!("{}\u{2013}{}", r.start, r.end))
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "Closed".to_string()
        };
        Self {
            day: capitalize(day),
            enabled: entry.enabled,
            hours,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub status: &'static str,
    pub business_info: Vec<InfoField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<Vec<DayHours>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_rules: Option<Vec<InfoField>>,
    pub raw_data: String,
}

impl ConversationDetail {
    pub fn from_conversation(conversation: &Conversation) -> Self {
        let data = &conversation.collected_data;
        let business_type = data.business_type().map(capitalize);

        let business_info = [
            InfoField::new("Name", data.business_name()),
            InfoField::new("Type", business_type.as_deref()),
            InfoField::new(
                "Phone",
                data.contact_phone()
                    .or(Some(conversation.external_id.as_str())),
            ),
            InfoField::new("Email", data.contact_email()),
            InfoField::new("Address", data.address()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let services = data
            .services()
            .filter(|s| !s.is_empty())
            .map(|services| {
                services
                    .into_iter()
                    .map(|s| ServiceLine {
                        summary: format!(
                            "{} min \u{b7} {}",
                            display_number(&s.duration_minutes),
                            format_ars(s.price)
                        ),
                        name: s.name,
                    })
                    .collect()
            });

        // days absent from the mapping, or unreadable, are left out
        let working_hours = data.working_hours().map(|hours| {
            DAY_ORDER
                .iter()
                .filter_map(|day| hours.day(day).map(|entry| DayHours::new(day, &entry)))
                .collect()
        });

        let booking_rules = data
            .booking_rules()
            .filter(|rules| !rules.is_empty())
            .map(|rules| {
                rules
                    .iter()
                    .filter_map(|(key, value)| {
                        InfoField::new(humanize_key(key), Some(display_value(value).as_str()))
                    })
                    .collect()
            });

        let raw_data =
            serde_json::to_string_pretty(data.as_map()).unwrap_or_else(|_| "{}".to_string());

        Self {
            id: conversation.id,
            title: data
                .business_name()
                .unwrap_or(conversation.user_name.as_str())
                .to_string(),
            subtitle: format!(
                "{} \u{b7} {}",
                conversation.user_name,
                conversation.channel.as_str()
            ),
            status: conversation.status.as_str(),
            business_info,
            services,
            working_hours,
            booking_rules,
            raw_data,
        }
    }
}
