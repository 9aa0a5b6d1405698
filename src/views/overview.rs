use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::conversation::{Conversation, ConversationStatus};
use crate::utils::format::{absolute_date, or_placeholder};

pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
pub struct Overview {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    /// Percentage of conversations completed, rounded
    pub completion_rate: u32,
    pub recent: Vec<RecentRow>,
}

#[derive(Debug, Serialize)]
pub struct RecentRow {
    pub id: i64,
    pub user_name: String,
    pub phone: String,
    pub business: String,
    pub status: &'static str,
    pub date: String,
    pub updated_at: DateTime<Utc>,
}

impl Overview {
    pub fn from_conversations(conversations: &[Conversation]) -> Self {
        let total = conversations.len();
        let count = |status: ConversationStatus| {
            conversations.iter().filter(|c| c.status == status).count()
        };
        let completed = count(ConversationStatus::Completed);
        let in_progress = count(ConversationStatus::Active);

        let completion_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };

        Self {
            total,
            completed,
            in_progress,
            completion_rate,
            recent: recent(conversations),
        }
    }
}

/// Most recently updated conversations first, at most five.
pub fn recent(conversations: &[Conversation]) -> Vec<RecentRow> {
    let mut sorted: Vec<&Conversation> = conversations.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    sorted
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|c| RecentRow {
            id: c.id,
            user_name: c.user_name.clone(),
            phone: c.external_id.clone(),
            business: or_placeholder(c.collected_data.business_name()),
            status: c.status.as_str(),
            date: absolute_date(c.updated_at),
            updated_at: c.updated_at,
        })
        .collect()
}
