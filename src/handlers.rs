use crate::errors::AppError;
use crate::forms::{MessageForm, SubscriberForm};
use crate::ist::now_ist;
use crate::notices::FlashNotifier;
use crate::page::{render_index, snapshot};
use crate::render::{EditPrefill, SendPrefill};
use crate::session::SessionId;
use crate::state::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct SubscriberInput {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub category: String,
    /// Set to `yes` by the page once the operator accepts the removal prompt.
    #[serde(default)]
    pub confirmed: Option<String>,
}

impl SubscriberInput {
    fn into_form(self) -> SubscriberForm {
        SubscriberForm {
            phone: self.phone,
            category: self.category,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageInput {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct RowInput {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub category: String,
}

/// Every page load refreshes the dashboard data first.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let session = SessionId::from_headers(&headers);
    state.dashboard.load().await;
    let (forms, notices) = state.sessions.take(&session);
    let screen = state.dashboard.screen().await;
    let html = render_index(&screen, &forms, &notices, &now_ist())?;
    Ok(session.attach(Html(html)))
}

pub async fn view(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionId::from_headers(&headers);
    let forms = state.sessions.forms(&session);
    let screen = state.dashboard.screen().await;
    let body = serde_json::to_value(snapshot(&screen, &forms)).unwrap_or(Value::Null);
    session.attach(Json(body))
}

pub async fn refresh(State(state): State<AppState>) -> Redirect {
    state.dashboard.load().await;
    Redirect::to("/")
}

pub async fn add_subscriber(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<SubscriberInput>,
) -> Response {
    let session = SessionId::from_headers(&headers);
    let notices = FlashNotifier::new();
    let form = input.into_form();
    state.dashboard.add_subscriber(&form, &notices).await;
    state
        .sessions
        .record(&session, notices.drain(), |forms| forms.subscriber = form);
    session.attach(Redirect::to("/"))
}

pub async fn update_subscriber(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<SubscriberInput>,
) -> Response {
    let session = SessionId::from_headers(&headers);
    let notices = FlashNotifier::new();
    let form = input.into_form();
    state.dashboard.update_subscriber(&form, &notices).await;
    state
        .sessions
        .record(&session, notices.drain(), |forms| forms.subscriber = form);
    session.attach(Redirect::to("/"))
}

/// The page asks the operator about exactly the phone it submits, so a
/// `confirmed=yes` answer belongs to `input.phone`.
pub async fn remove_subscriber(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<SubscriberInput>,
) -> Response {
    let session = SessionId::from_headers(&headers);
    let notices = FlashNotifier::new();
    let accepted = input.confirmed.as_deref() == Some("yes");
    let form = input.into_form();
    state
        .dashboard
        .remove_subscriber(&form.phone, &notices, |_| accepted)
        .await;
    state
        .sessions
        .record(&session, notices.drain(), |forms| forms.subscriber = form);
    session.attach(Redirect::to("/"))
}

pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<MessageInput>,
) -> Response {
    let session = SessionId::from_headers(&headers);
    let notices = FlashNotifier::new();
    let mut form = MessageForm {
        phone: input.phone,
        text: input.message,
        category: input.category,
    };
    state.dashboard.send_message(&mut form, &notices).await;
    state
        .sessions
        .record(&session, notices.drain(), |forms| forms.message = form);
    session.attach(Redirect::to("/"))
}

/// The row Edit control.
pub async fn edit_row(State(state): State<AppState>, headers: HeaderMap, Form(input): Form<RowInput>) -> Response {
    let session = SessionId::from_headers(&headers);
    let category = if input.category.is_empty() {
        state.dashboard.config().default_category.clone()
    } else {
        input.category
    };
    let edit = EditPrefill {
        phone: input.phone,
        category,
    };
    state
        .sessions
        .record(&session, Vec::new(), |forms| forms.prefill_edit(&edit));
    session.attach(Redirect::to("/"))
}

/// The row Send control.
pub async fn send_row(State(state): State<AppState>, headers: HeaderMap, Form(input): Form<RowInput>) -> Response {
    let session = SessionId::from_headers(&headers);
    let send = SendPrefill { phone: input.phone };
    state
        .sessions
        .record(&session, Vec::new(), |forms| forms.prefill_send(&send));
    session.attach(Redirect::to("/"))
}
