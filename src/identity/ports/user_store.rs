//! User store port for profile persistence.

use crate::identity::domain::{AppUser, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user store operations.
pub type UserStoreResult<T> = Result<T, UserStoreError>;

/// User profile persistence contract.
///
/// The store holds the full profile collection; identity services operate on
/// snapshots and write back the whole collection, matching the
/// persistence collaborator's read/replace contract.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Loads all registered users.
    async fn load(&self) -> UserStoreResult<Vec<AppUser>>;

    /// Replaces the stored user collection.
    async fn replace(&self, users: Vec<AppUser>) -> UserStoreResult<()>;
}

/// Errors returned by user store implementations.
#[derive(Debug, Clone, Error)]
pub enum UserStoreError {
    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
