use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Categories the subscriber API knows how to deliver.
pub const CATEGORIES: [&str; 3] = ["motivation", "mental_health", "mindfulness"];

/// Category the API files one-off messages under when none is chosen.
pub const CUSTOM_CATEGORY: &str = "custom";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_category: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of `GET /subscribers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriberList {
    #[serde(default)]
    pub subscribers: Vec<Subscriber>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Body of `GET /analytics`. The API answers `{}` when aggregation fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    #[serde(default)]
    pub total_messages: Option<u64>,
    #[serde(default)]
    pub category_counts: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    pub daily_counts: Option<BTreeMap<String, u64>>,
}

/// Body of `POST /subscribers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SubscriberCommand {
    Add { phone: String, category: String },
    Update { phone: String, category: String },
    Remove { phone: String },
}

impl SubscriberCommand {
    pub fn phone(&self) -> &str {
        match self {
            Self::Add { phone, .. } | Self::Update { phone, .. } | Self::Remove { phone } => phone,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Add { .. } => "adding",
            Self::Update { .. } => "updating",
            Self::Remove { .. } => "removing",
        }
    }

    pub fn success_text(&self) -> &'static str {
        match self {
            Self::Add { .. } => "Subscriber added successfully!",
            Self::Update { .. } => "Subscriber updated successfully!",
            Self::Remove { .. } => "Subscriber removed successfully!",
        }
    }
}

/// Body of `POST /send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessage {
    pub phone: String,
    pub message: String,
    pub category: String,
}

/// Reply to either write endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}
