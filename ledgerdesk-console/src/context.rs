//! Console context shared by every page controller

use crate::view::{Alert, View};
use ledgerdesk_client::{
    ApiClientConfig, Gateway, KeyValueStore, LedgerApi, Navigator, SessionManager,
};
use ledgerdesk_core::{ConsoleConfig, LedgerError, LedgerResult};
use std::sync::Arc;
use tracing::debug;

/// Session, backend access, view and configuration bundled for controllers.
#[derive(Clone)]
pub struct ConsoleContext {
    session: Arc<SessionManager>,
    api: LedgerApi,
    view: Arc<dyn View>,
    config: Arc<ConsoleConfig>,
}

impl ConsoleContext {
    pub fn new(
        config: ConsoleConfig,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        view: Arc<dyn View>,
    ) -> LedgerResult<Self> {
        let session = Arc::new(SessionManager::new(store, navigator));
        let gateway = Gateway::new(ApiClientConfig::from(&config.api), session.clone())?;

        debug!(base_url = %config.api.base_url, "Console context created");

        Ok(Self {
            session,
            api: LedgerApi::new(gateway),
            view,
            config: Arc::new(config),
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn api(&self) -> &LedgerApi {
        &self.api
    }

    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn notify_success(&self, text: &str) {
        self.view.show_alert(Alert::success(text));
    }

    /// Log `error` and show its user-facing message, if it has one.
    ///
    /// Authentication failures show nothing: the session is already gone and
    /// the navigator has been sent to login.
    pub fn report(&self, error: &LedgerError, fallback: &str) {
        error.log();
        if let Some(message) = error.user_message(fallback) {
            self.view.show_alert(Alert::danger(message));
        }
    }

    /// [`report`](Self::report) the error of a failed result and pass it on.
    pub fn reported<T>(&self, result: LedgerResult<T>, fallback: &str) -> LedgerResult<T> {
        result.map_err(|e| {
            self.report(&e, fallback);
            e
        })
    }
}
