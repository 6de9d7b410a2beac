//! Seams between the dashboard logic and whatever displays it.

use crate::chart::ChartContext;
use crate::render::{AnalyticsCounters, SubscriberTable};
use serde::Serialize;

/// A rendering target for dashboard data.
pub trait Presenter {
    /// Replace the subscriber table and its total counter.
    fn render_subscribers(&mut self, table: SubscriberTable);

    /// Show fresh analytics counters. Both charts in `charts` have already
    /// been redrawn for this snapshot.
    fn render_analytics(&mut self, counters: AnalyticsCounters, charts: &ChartContext);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Operator-facing feedback for actions.
pub trait Notifier {
    fn notify(&self, kind: NotificationKind, message: &str);
}
