//! Session Manager
//!
//! Owns the bearer token and the cached admin identity. Both live in the
//! injected [`KeyValueStore`] under `token` and `adminInfo` and are only ever
//! written or removed together.

use crate::store::KeyValueStore;
use ledgerdesk_core::{validation_error, AdminInfo, ErrorContext, LedgerError, LedgerResult};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub const TOKEN_KEY: &str = "token";
pub const ADMIN_INFO_KEY: &str = "adminInfo";

/// Console destinations a navigation can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Users,
    Clients,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Dashboard => "dashboard",
            Route::Users => "users",
            Route::Clients => "clients",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where page transitions are sent.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

/// A complete, consistent session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub admin: AdminInfo,
}

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    clearing: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            clearing: Mutex::new(()),
        }
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// True iff a token is present in the store.
    pub fn has_session(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Stored admin identity. `None` when absent or malformed.
    pub fn current_admin(&self) -> Option<AdminInfo> {
        let raw = match self.store.get(ADMIN_INFO_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read admin info");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(admin) => Some(admin),
            Err(e) => {
                debug!(error = %e, "Stored admin info is malformed");
                None
            }
        }
    }

    /// Both halves of the session, or `None` if either is missing.
    pub fn load(&self) -> Option<Session> {
        let token = self.token()?;
        let admin = self.current_admin()?;
        Some(Session { token, admin })
    }

    /// Persist token and admin identity in a single store write.
    pub fn establish(&self, token: &str, admin: &AdminInfo) -> LedgerResult<()> {
        if token.is_empty() {
            return Err(validation_error!(
                "Access token must not be empty",
                "access_token",
                "session_manager"
            ));
        }

        let admin_json = serde_json::to_string(admin)?;
        self.store
            .set(&[(TOKEN_KEY, token), (ADMIN_INFO_KEY, admin_json.as_str())])?;

        info!(admin = %admin.name, "Session established");
        Ok(())
    }

    /// Drop both entries and send the console back to login.
    ///
    /// Only the first of several concurrent 401s does anything; once the
    /// store is empty further calls are no-ops.
    pub fn clear(&self) {
        let _guard = self.clearing.lock().unwrap_or_else(|e| e.into_inner());
        if !self.has_stored_state() {
            debug!("No session stored, nothing to clear");
            return;
        }

        if let Err(e) = self.store.clear(&[TOKEN_KEY, ADMIN_INFO_KEY]) {
            warn!(error = %e, "Failed to clear session store");
        }
        info!("Session cleared");
        self.navigator.navigate(Route::Login);
    }

    /// Whether either session key is present. A failed read counts as
    /// present so the clear is still attempted.
    fn has_stored_state(&self) -> bool {
        [TOKEN_KEY, ADMIN_INFO_KEY]
            .iter()
            .any(|key| !matches!(self.store.get(key), Ok(None)))
    }

    /// Guard run before any page fetches data.
    ///
    /// A token without a readable admin identity is an inconsistent state
    /// and is cleared like a missing session.
    pub fn require_session(&self) -> LedgerResult<Session> {
        if let Some(session) = self.load() {
            return Ok(session);
        }

        let message = if self.has_stored_state() {
            warn!("Incomplete session in store, discarding it");
            self.clear();
            "Stored session is incomplete"
        } else {
            self.navigator.navigate(Route::Login);
            "Not logged in"
        };

        Err(LedgerError::Session {
            message: message.to_string(),
            context: ErrorContext::new("session_manager")
                .with_operation("require_session")
                .with_suggestion("Run 'ledgerdesk login' to sign in"),
        })
    }

    /// Login page guard: an existing token goes straight to the dashboard.
    pub fn redirect_if_authenticated(&self) -> bool {
        if self.has_session() {
            self.navigator.navigate(Route::Dashboard);
            true
        } else {
            false
        }
    }
}
