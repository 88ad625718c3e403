//! ledgerdesk client - session state and backend access
//!
//! - [`store`]: durable key-value storage for the session entries
//! - [`session`]: the Session Manager and navigation capability
//! - [`api`]: the authenticated gateway and typed backend operations

pub mod api;
pub mod session;
pub mod store;

pub use api::{ApiClientConfig, Clients, EntityResource, Gateway, LedgerApi, Users};
pub use session::{
    Navigator, RecordingNavigator, Route, Session, SessionManager, ADMIN_INFO_KEY, TOKEN_KEY,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
