//! Remote Data Gateway

use super::{create_http_client, extract_detail, status_suggestion, ApiClientConfig};
use crate::session::{Session, SessionManager};
use ledgerdesk_core::{ErrorContext, LedgerError, LedgerResult};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Issues every request the console makes.
///
/// Authenticated calls read the session right before sending, attach the
/// bearer credential and clear the session on 401. Requests are sent once:
/// no retries, no backoff.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    config: ApiClientConfig,
    session: Arc<SessionManager>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Bearer,
}

impl Gateway {
    pub fn new(config: ApiClientConfig, session: Arc<SessionManager>) -> LedgerResult<Self> {
        let client = create_http_client(&config)?;

        info!("Created ledger gateway for {}", config.base_url);

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> LedgerResult<T> {
        let session = self.session.require_session()?;
        let request = self.authorized(Method::GET, path, &session);
        self.dispatch(request, Method::GET, path, Access::Bearer)
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> LedgerResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let session = self.session.require_session()?;
        let request = self.authorized(Method::POST, path, &session).json(body);
        self.dispatch(request, Method::POST, path, Access::Bearer)
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> LedgerResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let session = self.session.require_session()?;
        let request = self.authorized(Method::PUT, path, &session).json(body);
        self.dispatch(request, Method::PUT, path, Access::Bearer)
            .await
    }

    /// PUT without a request body.
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> LedgerResult<T> {
        let session = self.session.require_session()?;
        let request = self.authorized(Method::PUT, path, &session);
        self.dispatch(request, Method::PUT, path, Access::Bearer)
            .await
    }

    /// POST without credentials. A 401 here is a rejected login, not an
    /// expired session, so the store is left alone.
    pub async fn post_public<B, T>(&self, path: &str, body: &B) -> LedgerResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .request(Method::POST, self.config.url(path))
            .json(body);
        self.dispatch(request, Method::POST, path, Access::Public)
            .await
    }

    fn authorized(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        self.client
            .request(method, self.config.url(path))
            .bearer_auth(&session.token)
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
        access: Access,
    ) -> LedgerResult<T> {
        debug!(%method, path, "Sending request");

        let response = request.send().await.map_err(|e| LedgerError::Network {
            message: format!("{} {} failed: {}", method, path, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("gateway")
                .with_operation(method.as_str())
                .with_metadata("path", path)
                .with_suggestion("Check that the backend is running and reachable"),
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| LedgerError::Network {
            message: format!("Failed to read response body of {} {}: {}", method, path, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("gateway")
                .with_operation(method.as_str())
                .with_metadata("path", path),
        })?;

        debug!(%method, path, status = status.as_u16(), "Backend responded");

        if status == StatusCode::UNAUTHORIZED && access == Access::Bearer {
            warn!(path, "Bearer credential rejected, clearing session");
            self.session.clear();
            return Err(LedgerError::Authentication {
                message: extract_detail(&body)
                    .unwrap_or_else(|| "Could not validate credentials".to_string()),
                context: ErrorContext::new("gateway")
                    .with_operation(method.as_str())
                    .with_metadata("path", path)
                    .with_suggestion("Run 'ledgerdesk login' to sign in again"),
            });
        }

        if !status.is_success() {
            return Err(LedgerError::Api {
                status: status.as_u16(),
                detail: extract_detail(&body),
                context: ErrorContext::new("gateway")
                    .with_operation(method.as_str())
                    .with_metadata("path", path)
                    .with_suggestion(status_suggestion(status.as_u16())),
            });
        }

        serde_json::from_slice(&body).map_err(|e| LedgerError::InvalidResponse {
            message: format!("Unexpected response body from {} {}: {}", method, path, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("gateway")
                .with_operation(method.as_str())
                .with_metadata("path", path),
        })
    }
}
