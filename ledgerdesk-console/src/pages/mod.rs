//! Page controllers
//!
//! One controller per console page. Each runs the session guard before it
//! fetches anything, reports failures through the view, and after a
//! successful mutation reloads its whole data set once.

use async_trait::async_trait;
use ledgerdesk_client::Route;
use ledgerdesk_core::LedgerResult;

pub mod auth;
pub mod dashboard;
pub mod entity;

pub use auth::{AuthPage, REGISTRATION_SUCCESS_MESSAGE};
pub use dashboard::DashboardPage;
pub use entity::{ClientsPage, ConsoleEntity, EntityPage, UsersPage};

#[async_trait]
pub trait Page: Send + Sync {
    fn route(&self) -> Route;

    /// Everything that happens when the page is opened.
    async fn load(&self) -> LedgerResult<()>;
}
