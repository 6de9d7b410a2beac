//! Per-browser form contents and pending notices, keyed by a cookie.

use crate::forms::FormState;
use crate::ports::Notification;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "uplift_session";
const MAX_SESSIONS: usize = 1024;

/// The session a request belongs to, read from its cookie or issued fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId {
    id: String,
    issued: bool,
}

impl SessionId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let existing = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Uuid::parse_str(value).ok());
        match existing {
            Some(id) => Self {
                id: id.to_string(),
                issued: false,
            },
            None => Self {
                id: Uuid::new_v4().to_string(),
                issued: true,
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Adds `Set-Cookie` when the id was issued for this request.
    pub fn attach(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.issued {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(err) => warn!("invalid session cookie: {err}"),
            }
        }
        response
    }
}

#[derive(Debug)]
struct Session {
    forms: FormState,
    notices: Vec<Notification>,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    by_id: HashMap<String, Session>,
    clock: u64,
}

/// Form contents and undelivered notices for each operator.
#[derive(Debug)]
pub struct SessionStore {
    default_category: String,
    sessions: Mutex<Sessions>,
}

impl SessionStore {
    pub fn new(default_category: &str) -> Self {
        Self {
            default_category: default_category.to_string(),
            sessions: Mutex::new(Sessions::default()),
        }
    }

    pub fn forms(&self, id: &SessionId) -> FormState {
        self.with_session(id, |session| session.forms.clone())
    }

    /// Form contents plus the notices queued since the last call. Notices are
    /// handed out once.
    pub fn take(&self, id: &SessionId) -> (FormState, Vec<Notification>) {
        self.with_session(id, |session| {
            (session.forms.clone(), std::mem::take(&mut session.notices))
        })
    }

    /// Apply `edit` to the session's forms and queue `notices` for its next page.
    pub fn record<F>(&self, id: &SessionId, notices: Vec<Notification>, edit: F)
    where
        F: FnOnce(&mut FormState),
    {
        self.with_session(id, |session| {
            edit(&mut session.forms);
            session.notices.extend(notices);
        });
    }

    pub fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_session<T>(&self, id: &SessionId, f: impl FnOnce(&mut Session) -> T) -> T {
        let mut sessions = self.lock();
        sessions.clock += 1;
        let now = sessions.clock;
        let by_id = &mut sessions.by_id;
        if !by_id.contains_key(id.as_str()) && by_id.len() >= MAX_SESSIONS {
            let idle = by_id
                .iter()
                .min_by_key(|(_, session)| session.last_used)
                .map(|(key, _)| key.clone());
            if let Some(idle) = idle {
                debug!(session = %idle, "dropping idle session");
                by_id.remove(&idle);
            }
        }
        let session = by_id.entry(id.as_str().to_string()).or_insert_with(|| Session {
            forms: FormState::new(&self.default_category),
            notices: Vec::new(),
            last_used: now,
        });
        session.last_used = now;
        f(session)
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        match self.sessions.lock() {
            Ok(sessions) => sessions,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NotificationKind;

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn notice(message: &str) -> Notification {
        Notification {
            kind: NotificationKind::Warning,
            message: message.into(),
        }
    }

    #[test]
    fn reuses_cookie_id_and_issues_one_when_missing() {
        let id = "6c3f1d0e-8a1b-4c55-9d0e-2f7a9b3c4d5e";
        let known = SessionId::from_headers(&cookie_headers(&format!("theme=dark; {SESSION_COOKIE}={id}")));
        assert_eq!(known.as_str(), id);
        let response = known.attach("ok");
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let fresh = SessionId::from_headers(&HeaderMap::new());
        assert_ne!(fresh.as_str(), id);
        let response = fresh.attach("ok");
        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={}", fresh.as_str())));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn forged_cookie_value_gets_a_new_id() {
        let id = SessionId::from_headers(&cookie_headers(&format!("{SESSION_COOKIE}=<script>")));
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert!(id.attach("ok").headers().contains_key(header::SET_COOKIE));
    }

    #[test]
    fn sessions_keep_their_own_forms_and_notices() {
        let store = SessionStore::new("motivation");
        let first = SessionId::from_headers(&HeaderMap::new());
        let second = SessionId::from_headers(&HeaderMap::new());

        store.record(&first, vec![notice("Please enter a phone number")], |forms| {
            forms.subscriber.phone = "+1AAA".into();
        });

        let (forms, notices) = store.take(&second);
        assert_eq!(forms.subscriber.phone, "");
        assert_eq!(forms.subscriber.category, "motivation");
        assert!(notices.is_empty());

        let (forms, notices) = store.take(&first);
        assert_eq!(forms.subscriber.phone, "+1AAA");
        assert_eq!(notices, vec![notice("Please enter a phone number")]);
        assert!(store.take(&first).1.is_empty());
        assert_eq!(store.forms(&first).subscriber.phone, "+1AAA");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn store_drops_the_idlest_session_when_full() {
        let store = SessionStore::new("motivation");
        let ids: Vec<SessionId> = (0..MAX_SESSIONS)
            .map(|_| SessionId::from_headers(&HeaderMap::new()))
            .collect();
        for id in &ids {
            store.record(id, Vec::new(), |forms| forms.message.text = "draft".into());
        }
        store.forms(&ids[0]);

        let newcomer = SessionId::from_headers(&HeaderMap::new());
        store.forms(&newcomer);

        assert_eq!(store.len(), MAX_SESSIONS);
        assert_eq!(store.forms(&ids[0]).message.text, "draft");
        assert_eq!(store.forms(&ids[1]).message.text, "");
    }
}
