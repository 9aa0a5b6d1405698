use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Whatsapp,
    Telegram,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Whatsapp => "whatsapp",
            Channel::Telegram => "telegram",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Completed,
    Active,
    Reviewing,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Completed => "completed",
            ConversationStatus::Active => "active",
            ConversationStatus::Reviewing => "reviewing",
        }
    }
}

/// An onboarding conversation as returned by the Conversations API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i64,
    pub external_id: String,
    pub channel: Channel,
    pub status: ConversationStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collected_data: CollectedData,
    pub token: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Free-form mapping filled in by the onboarding flow.
///
/// The raw mapping is kept as-is so unknown keys survive; the accessors below
/// only interpret the keys the dashboard knows how to display. A recognized key
/// holding a value of the wrong shape is treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CollectedData(pub Map<String, Value>);

impl CollectedData {
    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object)
    }

    pub fn business_name(&self) -> Option<&str> {
        self.text("business_name")
    }

    pub fn business_type(&self) -> Option<&str> {
        self.text("business_type")
    }

    pub fn contact_phone(&self) -> Option<&str> {
        self.text("contact_phone")
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.text("contact_email")
    }

    pub fn address(&self) -> Option<&str> {
        self.text("address")
    }

    /// Entries that do not read as a service are skipped; the rest are kept
    /// in payload order.
    pub fn services(&self) -> Option<Vec<Service>> {
        let entries = self.0.get("services")?.as_array()?;
        Some(entries.iter().filter_map(parse).collect())
    }

    pub fn working_hours(&self) -> Option<WorkingHours<'_>> {
        self.object("working_hours").map(WorkingHours)
    }

    pub fn booking_rules(&self) -> Option<&Map<String, Value>> {
        self.object("booking_rules")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn parse<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

/// The `working_hours` mapping. Keys other than weekdays (a timezone, say)
/// stay in the raw data and are never read here.
#[derive(Debug, Clone, Copy)]
pub struct WorkingHours<'a>(&'a Map<String, Value>);

impl WorkingHours<'_> {
    /// The entry for one day, or `None` when the day is missing or malformed.
    pub fn day(&self, day: &str) -> Option<WorkingHoursEntry> {
        self.0.get(day).and_then(parse)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub name: String,
    pub duration_minutes: Number,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingHoursEntry {
    pub enabled: bool,
    #[serde(default)]
    pub ranges: Vec<TimeRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}
