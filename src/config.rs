use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";
pub const DEFAULT_CATEGORY: &str = "motivation";
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime settings for the dashboard, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the subscriber API, without a trailing slash.
    pub api_url: String,
    /// Sent as `x-api-key` on every request when present.
    pub api_key: Option<String>,
    /// Category prefilled into the forms when a subscriber has none.
    pub default_category: String,
    /// Look-back window passed to `/analytics` as `?days=`.
    pub analytics_days: Option<u32>,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            default_category: DEFAULT_CATEGORY.to_string(),
            analytics_days: None,
            port: DEFAULT_PORT,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_url = non_empty("UPLIFT_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        Self {
            api_url,
            api_key: non_empty("UPLIFT_API_KEY"),
            default_category: non_empty("UPLIFT_DEFAULT_CATEGORY")
                .unwrap_or(defaults.default_category),
            analytics_days: parse_var("UPLIFT_ANALYTICS_DAYS", non_empty("UPLIFT_ANALYTICS_DAYS")),
            port: parse_var("PORT", non_empty("PORT")).unwrap_or(defaults.port),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring invalid {key}={value:?}");
            None
        }
    }
}
