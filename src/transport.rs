use crate::config::DashboardConfig;
use crate::errors::ClientError;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Method and optional JSON body for a single API call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post_json(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
        }
    }
}

/// Every outbound call to the subscriber API goes through here.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Transport {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key),
            None => req,
        }
    }

    /// Dispatch one request. Non-2xx statuses are returned as responses; the
    /// API reports application failures in the body.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> Result<Response, ClientError> {
        let url = self.url(path);
        debug!(method = %options.method, %url, "dispatching API request");
        let mut req = self.http.request(options.method, &url);
        if let Some(body) = &options.body {
            req = req.json(body);
        }
        Ok(self.with_auth(req).send().await?)
    }

    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let resp = self.fetch(path, options).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use serde_json::json;

    fn transport_for(api_url: String, api_key: Option<&str>) -> Transport {
        Transport::new(&DashboardConfig {
            api_url,
            api_key: api_key.map(str::to_string),
            ..DashboardConfig::default()
        })
    }

    #[test]
    fn url_joins_base_and_path() {
        let transport = transport_for("http://api.test/prod/".into(), None);
        assert_eq!(transport.url("/send"), "http://api.test/prod/send");
    }

    #[tokio::test]
    async fn attaches_api_key_when_configured() {
        let api = FakeApi::default();
        let base = api.clone().spawn().await;
        let transport = transport_for(base, Some("k-123"));

        transport.fetch("/subscribers", RequestOptions::get()).await.unwrap();

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].api_key.as_deref(), Some("k-123"));
    }

    #[tokio::test]
    async fn omits_api_key_when_absent() {
        let api = FakeApi::default();
        let base = api.clone().spawn().await;
        let transport = transport_for(base, None);

        transport
            .fetch("/send", RequestOptions::post_json(json!({ "phone": "+1" })))
            .await
            .unwrap();

        let requests = api.requests();
        assert_eq!(requests[0].api_key, None);
        assert_eq!(requests[0].body, Some(json!({ "phone": "+1" })));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let api = FakeApi::default();
        api.set_raw_subscribers("<html>bad gateway</html>");
        let base = api.clone().spawn().await;
        let transport = transport_for(base, None);

        let result: Result<Value, _> = transport.fetch_json("/subscribers", RequestOptions::get()).await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_error() {
        let transport = transport_for("http://127.0.0.1:1".into(), None);
        let result: Result<Value, _> = transport.fetch_json("/analytics", RequestOptions::get()).await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }
}
