//! Typed access to the ledger backend
//!
//! [`Gateway`] is the single place requests are sent from; [`LedgerApi`]
//! turns backend operations into typed calls on top of it. Users and clients
//! share one set of list/metrics/create/transaction operations, parameterised
//! by an [`EntityResource`].

use ledgerdesk_core::{ApiConfig, ErrorContext, LedgerError, LedgerResult};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

pub mod clients;
pub mod gateway;
pub mod ledger;
pub mod users;


pub use clients::Clients;
pub use gateway::Gateway;
pub use ledger::LedgerApi;
pub use users::Users;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
    /// Additional headers
    pub headers: HashMap<String, String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        ApiClientConfig::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_seconds: config.timeout_seconds,
            user_agent: config.user_agent.clone(),
            headers: HashMap::new(),
        }
    }
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set additional header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Join a resource path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// One of the two ledger-subject entity types tracked per admin.
///
/// The associated types are the DTOs the backend uses for that entity; the
/// constants are the path segments its endpoints are built from.
pub trait EntityResource: Send + Sync + 'static {
    type Record: DeserializeOwned + Serialize + Clone + Debug + Send + Sync;
    type Metrics: DeserializeOwned + Clone + Debug + Send + Sync;
    type NewRecord: Serialize + Debug + Send + Sync;
    type Transaction: Serialize + Debug + Send + Sync;
    type RecordDetails: DeserializeOwned + Debug + Send;
    type PanelEntry: DeserializeOwned + Debug + Send;

    /// Display label, e.g. "User"
    const LABEL: &'static str;
    /// Path segment for a single entity, e.g. "user"
    const SINGULAR: &'static str;
    /// Path segment for the collection, e.g. "users"
    const PLURAL: &'static str;

    fn record_id(record: &Self::Record) -> i64;

    /// Zero-valued metrics shown when the per-row fetch fails.
    fn fallback_metrics() -> Self::Metrics;
}

/// Helper function to create HTTP client with common configuration
pub(crate) fn create_http_client(config: &ApiClientConfig) -> LedgerResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            LedgerError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    for (key, value) in &config.headers {
        let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            LedgerError::Config {
                message: format!("Invalid header name '{}': {}", key, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?;

        let header_value =
            reqwest::header::HeaderValue::from_str(value).map_err(|e| LedgerError::Config {
                message: format!("Invalid header value for '{}': {}", key, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            })?;

        headers.insert(header_name, header_value);
    }

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = config.timeout_seconds {
        builder = builder.timeout(std::time::Duration::from_secs(timeout));
    }

    builder.build().map_err(|e| LedgerError::Config {
        message: format!("Failed to create HTTP client: {}", e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("http_client").with_operation("create_client"),
    })
}

/// Pull the string `detail` out of an error body, if there is one.
///
/// Validation failures carry `detail` as an array of objects; those yield
/// `None` so the caller's generic message is shown instead.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

pub(crate) fn status_suggestion(status: u16) -> &'static str {
    match status {
        400 | 422 => "Check the submitted values",
        403 => "The session belongs to a different admin",
        404 => "The record no longer exists",
        _ => "Check the backend logs and API status",
    }
}
