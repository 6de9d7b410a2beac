use crate::render::{EditPrefill, SendPrefill};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscriberForm {
    pub phone: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageForm {
    pub phone: String,
    pub text: String,
    pub category: String,
}

/// What the operator currently has typed into the two forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub subscriber: SubscriberForm,
    pub message: MessageForm,
}

impl FormState {
    pub fn new(default_category: &str) -> Self {
        Self {
            subscriber: SubscriberForm {
                category: default_category.to_string(),
                ..SubscriberForm::default()
            },
            message: MessageForm {
                category: default_category.to_string(),
                ..MessageForm::default()
            },
        }
    }

    pub fn prefill_edit(&mut self, edit: &EditPrefill) {
        self.subscriber.phone = edit.phone.clone();
        self.subscriber.category = edit.category.clone();
    }

    pub fn prefill_send(&mut self, send: &SendPrefill) {
        self.message.phone = send.phone.clone();
    }
}
