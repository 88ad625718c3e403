//! ledgerdesk console - page controllers for the ledger admin console
//!
//! This crate sits between the backend client and whatever presents the
//! console. It includes:
//!
//! - A [`ConsoleContext`] bundling session, API access, view and config
//! - Page controllers for login, the dashboard, users and clients
//! - Concurrent per-row metric enrichment for list pages
//! - An HTML render layer built on `maud`
//!
//! ## Architecture
//!
//! - **Client** (ledgerdesk-client): session store and REST gateway
//! - **Console** (this crate): page behaviour and rendering
//! - **Presentation** (ledgerdesk-cli): a [`View`] and a navigator

pub mod context;
pub mod enrich;
pub mod pages;
pub mod render;
pub mod view;

pub use context::ConsoleContext;
pub use enrich::{enrich_rows, Enriched};
pub use pages::{
    AuthPage, ClientsPage, ConsoleEntity, DashboardPage, EntityPage, Page, UsersPage,
    REGISTRATION_SUCCESS_MESSAGE,
};
pub use render::{format_date, format_inr, RenderEntity};
pub use view::{Alert, AlertKind, AuthForm, Modal, RecordingView, Region, View, ViewEvent};
