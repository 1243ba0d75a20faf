//! Port contracts for identity management.
//!
//! Ports define infrastructure-agnostic interfaces used by identity
//! services.

pub mod session;
pub mod user_store;

pub use session::SessionProvider;
pub use user_store::{UserStore, UserStoreError, UserStoreResult};
