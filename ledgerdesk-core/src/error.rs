//! Unified error handling
//!
//! Every failure in the console is one of a small set of kinds: the backend
//! rejected the credential, the backend rejected the request, the request never
//! got a response, or something local (storage, config) went wrong. Each error
//! carries an [`ErrorContext`] so the diagnostic logged next to the inline
//! message can be traced back to the operation that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Generic message shown for transport-level failures.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for ledgerdesk
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The backend answered 401: the session has been cleared.
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    /// No usable session in the store.
    #[error("Session error: {message}")]
    Session {
        message: String,
        context: ErrorContext,
    },

    /// Any other non-2xx answer from the backend.
    #[error("API error (HTTP {status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api {
        status: u16,
        detail: Option<String>,
        context: ErrorContext,
    },

    /// The request never produced a response.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl LedgerError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            LedgerError::Authentication { context, .. } => Some(context),
            LedgerError::Session { context, .. } => Some(context),
            LedgerError::Api { context, .. } => Some(context),
            LedgerError::Network { context, .. } => Some(context),
            LedgerError::InvalidResponse { context, .. } => Some(context),
            LedgerError::Validation { context, .. } => Some(context),
            LedgerError::Storage { context, .. } => Some(context),
            LedgerError::Config { context, .. } => Some(context),
            LedgerError::Internal { context, .. } => Some(context),
            LedgerError::Io(_) | LedgerError::Serialization(_) => None,
        }
    }

    /// True when the session is gone and the caller has been sent to login.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            LedgerError::Authentication { .. } | LedgerError::Session { .. }
        )
    }

    /// HTTP status of a backend rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            LedgerError::Authentication { .. } => Some(401),
            LedgerError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text to show inline for this error.
    ///
    /// Returns `None` for authentication failures: the redirect to login is
    /// the only feedback for those. Backend rejections show their `detail`
    /// when present, transport failures show [`NETWORK_ERROR_MESSAGE`] and
    /// everything else shows `fallback`.
    pub fn user_message(&self, fallback: &str) -> Option<String> {
        match self {
            LedgerError::Authentication { .. } | LedgerError::Session { .. } => None,
            LedgerError::Api {
                detail: Some(detail),
                ..
            } => Some(detail.clone()),
            LedgerError::Network { .. } => Some(NETWORK_ERROR_MESSAGE.to_string()),
            LedgerError::Validation { message, .. } => Some(message.clone()),
            _ => Some(fallback.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = self.context().map(|c| c.error_id.as_str());
        let operation = self.context().and_then(|c| c.operation.as_deref());
        match self {
            LedgerError::Authentication { .. } | LedgerError::Session { .. } => {
                warn!(?error_id, ?operation, error = %self, "Session rejected");
            }
            LedgerError::Network { .. } => {
                warn!(?error_id, ?operation, error = %self, "Request did not complete");
            }
            LedgerError::Api { status, .. } => {
                warn!(?error_id, ?operation, status, error = %self, "Backend rejected request");
            }
            LedgerError::Internal { .. } => {
                error!(?error_id, ?operation, error = %self, "Internal error occurred");
            }
            _ => {
                error!(?error_id, ?operation, error = %self, "Error occurred");
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::LedgerError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'ledgerdesk config init' to create a default config"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::LedgerError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! storage_error {
    ($msg:expr, $component:expr) => {
        $crate::LedgerError::Storage {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::LedgerError::Storage {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component),
        }
    };
}
