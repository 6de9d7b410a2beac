use crate::chart::{category_chart, daily_chart, Canvas, ChartContext};
use crate::models::{AnalyticsSnapshot, Subscriber, SubscriberList};
use crate::ports::Presenter;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const DEFAULT_CATEGORY_LABEL: &str = "Default";
pub const MISSING_DATE: &str = "N/A";
pub const INVALID_DATE: &str = "Invalid Date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub class: &'static str,
}

impl StatusBadge {
    pub fn for_active(active: bool) -> Self {
        if active {
            Self { label: "Active", class: "bg-success" }
        } else {
            Self { label: "Inactive", class: "bg-danger" }
        }
    }
}

/// Values the row's Edit control copies into the subscriber form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditPrefill {
    pub phone: String,
    pub category: String,
}

/// Value the row's Send control copies into the message form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendPrefill {
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberRow {
    pub phone: String,
    pub category: String,
    pub status: StatusBadge,
    pub created: String,
    pub edit: EditPrefill,
    pub send: SendPrefill,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscriberTable {
    pub rows: Vec<SubscriberRow>,
    /// As reported by the API, not the number of rows.
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsCounters {
    pub total_messages: u64,
    pub total_categories: usize,
}

pub fn subscriber_row(sub: &Subscriber, default_category: &str) -> SubscriberRow {
    SubscriberRow {
        phone: sub.phone_number.clone(),
        category: sub
            .preferred_category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY_LABEL.to_string()),
        status: StatusBadge::for_active(sub.active),
        created: format_created(sub.created_at.as_deref()),
        edit: EditPrefill {
            phone: sub.phone_number.clone(),
            category: sub
                .preferred_category
                .clone()
                .unwrap_or_else(|| default_category.to_string()),
        },
        send: SendPrefill {
            phone: sub.phone_number.clone(),
        },
    }
}

/// Short US-style date (`M/D/YYYY`) for a creation timestamp.
pub fn format_created(created_at: Option<&str>) -> String {
    let Some(raw) = created_at.filter(|s| !s.is_empty()) else {
        return MISSING_DATE.to_string();
    };
    match parse_date(raw) {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn analytics_counters(snapshot: &AnalyticsSnapshot) -> AnalyticsCounters {
    AnalyticsCounters {
        total_messages: snapshot.total_messages.unwrap_or(0),
        total_categories: snapshot.category_counts.as_ref().map_or(0, |m| m.len()),
    }
}

/// Project the subscriber list into a table, in server order.
pub fn render_subscribers<P: Presenter>(presenter: &mut P, list: SubscriberList, default_category: &str) {
    let rows = list
        .subscribers
        .iter()
        .map(|sub| subscriber_row(sub, default_category))
        .collect();
    presenter.render_subscribers(SubscriberTable {
        rows,
        total: list.count.unwrap_or(0),
    });
}

pub fn render_analytics<P: Presenter>(presenter: &mut P, charts: &mut ChartContext, snapshot: AnalyticsSnapshot) {
    let counters = analytics_counters(&snapshot);
    let category_counts = snapshot.category_counts.unwrap_or_default();
    let daily_counts = snapshot.daily_counts.unwrap_or_default();

    charts.replace(Canvas::CategoryChart, category_chart(&category_counts));
    charts.replace(Canvas::DailyChart, daily_chart(&daily_counts));
    presenter.render_analytics(counters, charts);
}
