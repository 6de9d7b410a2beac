use crate::chart::{Canvas, ChartContext, ChartInstance};
use crate::dashboard::Screen;
use crate::forms::FormState;
use crate::models::{CATEGORIES, CUSTOM_CATEGORY};
use crate::ports::{Notification, Presenter};
use crate::render::{AnalyticsCounters, SubscriberRow, SubscriberTable};
use askama::Template;
use serde::Serialize;

/// Presenter that keeps the latest table, counters and chart markup for the
/// HTML page.
#[derive(Debug, Default)]
pub struct HtmlPage {
    table: SubscriberTable,
    counters: AnalyticsCounters,
    category_svg: String,
    daily_svg: String,
}

impl HtmlPage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for HtmlPage {
    fn render_subscribers(&mut self, table: SubscriberTable) {
        self.table = table;
    }

    fn render_analytics(&mut self, counters: AnalyticsCounters, charts: &ChartContext) {
        self.counters = counters;
        if let Some(chart) = charts.get(Canvas::CategoryChart) {
            self.category_svg = chart.svg().to_string();
        }
        if let Some(chart) = charts.get(Canvas::DailyChart) {
            self.daily_svg = chart.svg().to_string();
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChartsSnapshot<'a> {
    pub category: Option<&'a ChartInstance>,
    pub daily: Option<&'a ChartInstance>,
    pub live: usize,
    pub created: u64,
    pub destroyed: u64,
}

/// JSON view of what the page currently shows to one session.
#[derive(Debug, Serialize)]
pub struct PageSnapshot<'a> {
    pub subscribers: &'a [SubscriberRow],
    pub total_subscribers: u64,
    pub total_messages: u64,
    pub total_categories: usize,
    pub charts: ChartsSnapshot<'a>,
    pub forms: &'a FormState,
}

pub fn snapshot<'a>(screen: &'a Screen<HtmlPage>, forms: &'a FormState) -> PageSnapshot<'a> {
    let page = &screen.presenter;
    PageSnapshot {
        subscribers: &page.table.rows,
        total_subscribers: page.table.total,
        total_messages: page.counters.total_messages,
        total_categories: page.counters.total_categories,
        charts: ChartsSnapshot {
            category: screen.charts.get(Canvas::CategoryChart),
            daily: screen.charts.get(Canvas::DailyChart),
            live: screen.charts.live_count(),
            created: screen.charts.created(),
            destroyed: screen.charts.destroyed(),
        },
        forms,
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SelectOption<'a> {
    value: &'a str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    refreshed_at: &'a str,
    notices: &'a [Notification],
    table: &'a SubscriberTable,
    counters: AnalyticsCounters,
    category_svg: &'a str,
    daily_svg: &'a str,
    forms: &'a FormState,
    category_options: Vec<SelectOption<'a>>,
    message_category_options: Vec<SelectOption<'a>>,
}

pub fn render_index(
    screen: &Screen<HtmlPage>,
    forms: &FormState,
    notices: &[Notification],
    refreshed_at: &str,
) -> askama::Result<String> {
    let page = &screen.presenter;
    let message_categories: Vec<&str> = CATEGORIES.iter().copied().chain([CUSTOM_CATEGORY]).collect();
    IndexTemplate {
        refreshed_at,
        notices,
        table: &page.table,
        counters: page.counters,
        category_svg: &page.category_svg,
        daily_svg: &page.daily_svg,
        forms,
        category_options: select_options(&CATEGORIES, &forms.subscriber.category),
        message_category_options: select_options(&message_categories, &forms.message.category),
    }
    .render()
}

/// A selected value outside `choices` is listed first so it stays selected.
fn select_options<'a>(choices: &[&'a str], selected: &'a str) -> Vec<SelectOption<'a>> {
    let mut options = Vec::with_capacity(choices.len() + 1);
    if !selected.is_empty() && !choices.contains(&selected) {
        options.push(SelectOption {
            value: selected,
            selected: true,
        });
    }
    options.extend(choices.iter().map(|&choice| SelectOption {
        value: choice,
        selected: choice == selected,
    }));
    options
}
