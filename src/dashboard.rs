use crate::chart::ChartContext;
use crate::config::DashboardConfig;
use crate::models::{AnalyticsSnapshot, SubscriberList};
use crate::ports::Presenter;
use crate::render::{render_analytics, render_subscribers};
use crate::transport::{RequestOptions, Transport};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error};

pub const SUBSCRIBERS_PATH: &str = "/subscribers";
pub const ANALYTICS_PATH: &str = "/analytics";
pub const SEND_PATH: &str = "/send";

/// What every operator sees: the rendered output and the charts drawn on it.
#[derive(Debug)]
pub struct Screen<P> {
    pub presenter: P,
    pub charts: ChartContext,
}

pub struct Dashboard<P> {
    pub(crate) config: DashboardConfig,
    pub(crate) transport: Transport,
    pub(crate) screen: Mutex<Screen<P>>,
}

impl<P: Presenter> Dashboard<P> {
    pub fn new(config: DashboardConfig, presenter: P) -> Self {
        Self {
            transport: Transport::new(&config),
            screen: Mutex::new(Screen {
                presenter,
                charts: ChartContext::new(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub async fn screen(&self) -> MutexGuard<'_, Screen<P>> {
        self.screen.lock().await
    }

    /// Fetch subscribers and analytics concurrently and render each as it
    /// arrives. Failures are logged and leave the previous render in place.
    pub async fn load(&self) {
        tokio::join!(self.load_subscribers(), self.load_analytics());
    }

    async fn load_subscribers(&self) {
        match self
            .transport
            .fetch_json::<SubscriberList>(SUBSCRIBERS_PATH, RequestOptions::get())
            .await
        {
            Ok(list) => {
                debug!(rows = list.subscribers.len(), "subscribers loaded");
                let mut screen = self.screen.lock().await;
                render_subscribers(&mut screen.presenter, list, &self.config.default_category);
            }
            Err(err) => error!("error loading subscribers: {err}"),
        }
    }

    async fn load_analytics(&self) {
        match self
            .transport
            .fetch_json::<AnalyticsSnapshot>(&self.analytics_path(), RequestOptions::get())
            .await
        {
            Ok(snapshot) => {
                let mut screen = self.screen.lock().await;
                let Screen { presenter, charts } = &mut *screen;
                render_analytics(presenter, charts, snapshot);
            }
            Err(err) => error!("error loading analytics: {err}"),
        }
    }

    pub fn analytics_path(&self) -> String {
        match self.config.analytics_days {
            Some(days) => format!("{ANALYTICS_PATH}?days={days}"),
            None => ANALYTICS_PATH.to_string(),
        }
    }
}
