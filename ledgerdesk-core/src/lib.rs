//! ledgerdesk core - shared data structures, errors, configuration and logging
//!
//! Everything the client and console crates agree on lives here: the backend
//! DTOs, the [`LedgerError`] taxonomy and the console configuration file.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
