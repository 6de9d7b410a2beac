//! In-process stand-ins for the subscriber API and the UI ports.

use crate::chart::ChartContext;
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::ports::{Notification, NotificationKind, Notifier, Presenter};
use crate::render::{AnalyticsCounters, SubscriberTable};
use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

struct FakeState {
    subscribers: String,
    analytics: String,
    outcome: String,
    requests: Vec<RecordedRequest>,
}

/// Serves canned bodies under `/api` and records every request it sees.
#[derive(Clone)]
pub struct FakeApi {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                subscribers: r#"{"subscribers":[],"count":0}"#.to_string(),
                analytics: r#"{"total_messages":0,"category_counts":{},"daily_counts":{}}"#.to_string(),
                outcome: r#"{"success":true,"message":"ok"}"#.to_string(),
                requests: Vec::new(),
            })),
        }
    }
}

impl FakeApi {
    pub fn set_subscribers(&self, body: Value) {
        self.set_raw_subscribers(&body.to_string());
    }

    pub fn set_raw_subscribers(&self, body: &str) {
        self.inner.lock().unwrap().subscribers = body.to_string();
    }

    pub fn set_analytics(&self, body: Value) {
        self.set_raw_analytics(&body.to_string());
    }

    pub fn set_raw_analytics(&self, body: &str) {
        self.inner.lock().unwrap().analytics = body.to_string();
    }

    pub fn set_outcome(&self, body: Value) {
        self.set_raw_outcome(&body.to_string());
    }

    pub fn set_raw_outcome(&self, body: &str) {
        self.inner.lock().unwrap().outcome = body.to_string();
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Bind an ephemeral port and return the API base URL.
    pub async fn spawn(self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(respond).with_state(self);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }
}

async fn respond(
    State(api): State<FakeApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        api_key: headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).ok(),
    });

    let payload = if method == Method::GET && uri.path() == "/api/subscribers" {
        state.subscribers.clone()
    } else if method == Method::GET && uri.path() == "/api/analytics" {
        state.analytics.clone()
    } else if method == Method::POST {
        state.outcome.clone()
    } else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let status = match serde_json::from_str::<Value>(&payload) {
        Ok(value) if value.get("success") == Some(&Value::Bool(false)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    (status, [(header::CONTENT_TYPE, "application/json")], payload).into_response()
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub table: Option<SubscriberTable>,
    pub counters: Option<AnalyticsCounters>,
    pub analytics_renders: usize,
}

impl Presenter for RecordingPresenter {
    fn render_subscribers(&mut self, table: SubscriberTable) {
        self.table = Some(table);
    }

    fn render_analytics(&mut self, counters: AnalyticsCounters, _charts: &ChartContext) {
        self.counters = Some(counters);
        self.analytics_renders += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.all().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.seen.lock().unwrap().push(Notification {
            kind,
            message: message.to_string(),
        });
    }
}

pub async fn dashboard_for(api: &FakeApi) -> Dashboard<RecordingPresenter> {
    let api_url = api.clone().spawn().await;
    let config = DashboardConfig {
        api_url,
        ..DashboardConfig::default()
    };
    Dashboard::new(config, RecordingPresenter::default())
}
