use crate::dashboard::{Dashboard, SEND_PATH, SUBSCRIBERS_PATH};
use crate::errors::ClientError;
use crate::forms::{MessageForm, SubscriberForm};
use crate::models::{ActionOutcome, SendMessage, SubscriberCommand};
use crate::ports::{NotificationKind, Notifier, Presenter};
use crate::transport::RequestOptions;
use serde::Serialize;
use tracing::{debug, error, info};

pub const MISSING_PHONE: &str = "Please enter a phone number";
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";
pub const MESSAGE_SENT: &str = "Message sent successfully!";

/// How a mutation action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// The API accepted the change.
    Completed,
    /// The API answered but reported failure.
    Rejected,
    /// No usable answer from the API.
    Failed,
    /// Stopped before dispatch by local validation.
    Invalid,
    /// The operator declined the confirmation.
    Cancelled,
}

impl<P: Presenter> Dashboard<P> {
    pub async fn add_subscriber(&self, form: &SubscriberForm, notifier: &impl Notifier) -> ActionStatus {
        let command = SubscriberCommand::Add {
            phone: form.phone.clone(),
            category: form.category.clone(),
        };
        self.manage(command, notifier).await
    }

    pub async fn update_subscriber(&self, form: &SubscriberForm, notifier: &impl Notifier) -> ActionStatus {
        if form.phone.is_empty() {
            notifier.notify(NotificationKind::Warning, MISSING_PHONE);
            return ActionStatus::Invalid;
        }
        let command = SubscriberCommand::Update {
            phone: form.phone.clone(),
            category: form.category.clone(),
        };
        self.manage(command, notifier).await
    }

    /// `confirm` receives the prompt naming `phone` and decides whether to go
    /// ahead. Only that phone is ever dispatched.
    pub async fn remove_subscriber<F>(&self, phone: &str, notifier: &impl Notifier, confirm: F) -> ActionStatus
    where
        F: FnOnce(&str) -> bool,
    {
        if phone.is_empty() {
            notifier.notify(NotificationKind::Warning, MISSING_PHONE);
            return ActionStatus::Invalid;
        }
        if !confirm(&format!("Are you sure you want to remove {phone}?")) {
            debug!(%phone, "removal declined");
            return ActionStatus::Cancelled;
        }
        let command = SubscriberCommand::Remove {
            phone: phone.to_string(),
        };
        self.manage(command, notifier).await
    }

    /// Clears `form.text` once the API accepts the message.
    pub async fn send_message(&self, form: &mut MessageForm, notifier: &impl Notifier) -> ActionStatus {
        let body = SendMessage {
            phone: form.phone.clone(),
            message: form.text.clone(),
            category: form.category.clone(),
        };
        match self.submit(SEND_PATH, &body).await {
            Ok(outcome) if outcome.success => {
                info!(phone = %body.phone, message_id = ?outcome.message_id, "message sent");
                notifier.notify(NotificationKind::Success, MESSAGE_SENT);
                form.text.clear();
                ActionStatus::Completed
            }
            Ok(outcome) => rejected(outcome, notifier),
            Err(err) => failed("sending message", err, notifier),
        }
    }

    async fn manage(&self, command: SubscriberCommand, notifier: &impl Notifier) -> ActionStatus {
        match self.submit(SUBSCRIBERS_PATH, &command).await {
            Ok(outcome) if outcome.success => {
                info!(phone = command.phone(), "{} subscriber succeeded", command.verb());
                notifier.notify(NotificationKind::Success, command.success_text());
                self.load().await;
                ActionStatus::Completed
            }
            Ok(outcome) => rejected(outcome, notifier),
            Err(err) => failed(&format!("{} subscriber", command.verb()), err, notifier),
        }
    }

    async fn submit<T: Serialize>(&self, path: &str, body: &T) -> Result<ActionOutcome, ClientError> {
        let body = serde_json::to_value(body)?;
        self.transport
            .fetch_json(path, RequestOptions::post_json(body))
            .await
    }

}

fn rejected(outcome: ActionOutcome, notifier: &impl Notifier) -> ActionStatus {
    let message = outcome.message.unwrap_or_default();
    notifier.notify(NotificationKind::Error, &format!("Error: {message}"));
    ActionStatus::Rejected
}

fn failed(what: &str, err: ClientError, notifier: &impl Notifier) -> ActionStatus {
    error!("error {what}: {err}");
    notifier.notify(NotificationKind::Error, GENERIC_FAILURE);
    ActionStatus::Failed
}
