use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::page::HtmlPage;
use crate::session::SessionStore;
use std::sync::Arc;

pub type WebDashboard = Dashboard<HtmlPage>;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<WebDashboard>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let sessions = SessionStore::new(&config.default_category);
        Self {
            dashboard: Arc::new(Dashboard::new(config, HtmlPage::new())),
            sessions: Arc::new(sessions),
        }
    }
}
