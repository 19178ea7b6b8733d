// Remote data gateway: a thin reqwest wrapper over the third-party data/AI
// service, adding the fixed auth headers and recording every call/response
// pair into a bounded in-memory log.
//
// Failure policy: no retry, no backoff, no request timeout. A hung remote
// call hangs the step that issued it. Errors are returned to the caller,
// never panicked past it, and the failed attempt is still logged.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::ApiLogEntry;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("remote gateway is not configured (missing credentials)")]
    NotConfigured,

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

// ---------------------------------------------------------------------------
// ApiLog
// ---------------------------------------------------------------------------

/// Bounded most-recent-first log of gateway invocations.
#[derive(Debug)]
pub struct ApiLog {
    entries: VecDeque<ApiLogEntry>,
    capacity: usize,
}

impl ApiLog {
    pub fn new(capacity: usize) -> Self {
        ApiLog {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an entry, evicting the oldest when at capacity.
    pub fn record(&mut self, entry: ApiLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn snapshot(&self) -> Vec<ApiLogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RemoteApi trait
// ---------------------------------------------------------------------------

/// Seam between orchestration code and the HTTP gateway. The provided
/// methods build the four request payload shapes the service understands;
/// implementors only supply `call` and `delete_object`.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Issue one JSON request and return the decoded response body.
    async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
    ) -> Result<Value, ApiError>;

    /// Delete a named remote object. Deletes are not recorded in the API
    /// log.
    async fn delete_object(&self, name: &str) -> Result<(), ApiError>;

    /// Stage raw string data into a named remote object.
    async fn input_data(&self, object_name: &str, data: Vec<String>) -> Result<Value, ApiError> {
        self.call(
            "/input_data",
            Method::POST,
            Some(json!({
                "created_object_name": object_name,
                "data_type": "strings",
                "input_data": data,
            })),
        )
        .await
    }

    /// Run a research request, staging results into `object_name`.
    async fn rapid_research(&self, object_name: &str, goal: &str) -> Result<Value, ApiError> {
        self.call(
            "/rapid_research",
            Method::POST,
            Some(json!({
                "created_object_name": object_name,
                "goal": goal,
            })),
        )
        .await
    }

    /// Apply a prompt transformation over `input_object`, accumulating into
    /// `created_object` (combine-events mode: successive writes to the same
    /// named object accumulate rather than overwrite).
    async fn apply_prompt(
        &self,
        created_object: &str,
        prompt: &str,
        input_object: &str,
    ) -> Result<Value, ApiError> {
        self.call(
            "/apply_prompt",
            Method::POST,
            Some(json!({
                "created_object_names": [created_object],
                "prompt_string": prompt,
                "inputs": [{
                    "input_object_name": input_object,
                    "mode": "combine_events",
                }],
            })),
        )
        .await
    }

    /// Fetch a named remote object. `return_type` is `json` or `pretty_text`.
    async fn return_data(&self, object_name: &str, return_type: &str) -> Result<Value, ApiError> {
        self.call(
            "/return_data",
            Method::POST,
            Some(json!({
                "object_name": object_name,
                "return_type": return_type,
            })),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// The fixed auth headers attached to every request.
#[derive(Debug, Clone)]
struct AuthHeaders {
    token: String,
    app_id: String,
    usage_key: String,
}

/// Live HTTP gateway. Constructed once at startup; when credentials are
/// incomplete every call fails fast with `ApiError::NotConfigured` (the
/// attempt is still logged, matching the "every invocation is recorded"
/// contract).
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Option<AuthHeaders>,
    log: Mutex<ApiLog>,
}

impl ApiClient {
    /// Build a client from the application config.
    pub fn from_config(config: &Config) -> Self {
        let auth = if config.credentials.is_complete() {
            Some(AuthHeaders {
                token: config.credentials.api_token.clone().unwrap_or_default(),
                app_id: config.credentials.app_id.clone().unwrap_or_default(),
                usage_key: config.credentials.usage_key.clone().unwrap_or_default(),
            })
        } else {
            None
        };

        ApiClient {
            http: reqwest::Client::new(),
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            auth,
            log: Mutex::new(ApiLog::new(config.ui.api_log_capacity)),
        }
    }

    /// Whether credentials are present and calls can go out.
    pub fn is_configured(&self) -> bool {
        self.auth.is_some()
    }

    /// Snapshot of the call log, most recent first.
    pub fn log_snapshot(&self) -> Vec<ApiLogEntry> {
        self.log.lock().expect("api log poisoned").snapshot()
    }

    pub fn clear_log(&self) {
        self.log.lock().expect("api log poisoned").clear();
    }

    fn record(&self, endpoint: &str, method: &Method, payload: Option<Value>, response: Value) {
        let now = Utc::now();
        let entry = ApiLogEntry {
            id: now.timestamp_millis(),
            timestamp: now,
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            payload,
            response,
        };
        self.log.lock().expect("api log poisoned").record(entry);
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
    ) -> Result<Value, ApiError> {
        let Some(auth) = &self.auth else {
            self.record(
                endpoint,
                &method,
                payload,
                json!({ "error": "gateway not configured" }),
            );
            return Err(ApiError::NotConfigured);
        };

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, %method, "gateway call");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", auth.token))
            .header("X-Generated-App-ID", &auth.app_id)
            .header("X-Usage-Key", &auth.usage_key);
        if let Some(body) = &payload {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(endpoint, error = %e, "gateway transport failure");
                self.record(endpoint, &method, payload, json!({ "error": e.to_string() }));
                return Err(ApiError::Transport {
                    endpoint: endpoint.to_string(),
                    source: e,
                });
            }
        };

        // The service reports errors in-band, so the body is decoded
        // whatever the HTTP status.
        match response.json::<Value>().await {
            Ok(data) => {
                self.record(endpoint, &method, payload, data.clone());
                Ok(data)
            }
            Err(e) => {
                warn!(endpoint, error = %e, "gateway response decode failure");
                self.record(endpoint, &method, payload, json!({ "error": e.to_string() }));
                Err(ApiError::Decode {
                    endpoint: endpoint.to_string(),
                    source: e,
                })
            }
        }
    }

    async fn delete_object(&self, name: &str) -> Result<(), ApiError> {
        let Some(auth) = &self.auth else {
            return Err(ApiError::NotConfigured);
        };

        let url = format!("{}/objects/{}", self.base_url, name);
        debug!(%url, "gateway delete");

        self.http
            .delete(&url)
            .header("Authorization", format!("Bearer {}", auth.token))
            .header("X-Generated-App-ID", &auth.app_id)
            .header("X-Usage-Key", &auth.usage_key)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: format!("/objects/{name}"),
                source: e,
            })?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, CredentialsConfig, ResearchConfig, UiConfig};

    fn entry(id: i64) -> ApiLogEntry {
        let now = Utc::now();
        ApiLogEntry {
            id,
            timestamp: now,
            endpoint: "/input_data".into(),
            method: "POST".into(),
            payload: None,
            response: json!({ "ok": true }),
        }
    }

    fn test_config(credentials: CredentialsConfig) -> Config {
        Config {
            api: ApiConfig {
                base_url: "https://example.test/api_tools/".into(),
            },
            research: ResearchConfig {
                categories: vec!["Finance software".into()],
            },
            ui: UiConfig::default(),
            credentials,
        }
    }

    #[test]
    fn log_caps_at_capacity_most_recent_first() {
        let mut log = ApiLog::new(10);
        for i in 0..15 {
            log.record(entry(i));
        }
        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 10);
        assert_eq!(snapshot[0].id, 14);
        assert_eq!(snapshot[9].id, 5);
    }

    #[test]
    fn log_clear_empties() {
        let mut log = ApiLog::new(10);
        log.record(entry(1));
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn client_without_credentials_is_disabled() {
        let client = ApiClient::from_config(&test_config(CredentialsConfig::default()));
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn disabled_client_fails_fast_and_still_logs() {
        let client = ApiClient::from_config(&test_config(CredentialsConfig::default()));
        let result = client
            .call("/input_data", Method::POST, Some(json!({ "x": 1 })))
            .await;
        assert!(matches!(result, Err(ApiError::NotConfigured)));

        let log = client.log_snapshot();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].endpoint, "/input_data");
        assert_eq!(log[0].response["error"], "gateway not configured");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let creds = CredentialsConfig {
            api_token: Some("t".into()),
            app_id: Some("a".into()),
            usage_key: Some("u".into()),
        };
        let client = ApiClient::from_config(&test_config(creds));
        assert!(client.is_configured());
        assert_eq!(client.base_url, "https://example.test/api_tools");
    }
}
