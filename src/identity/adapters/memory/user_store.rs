//! In-memory user store for identity tests and single-process deployments.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::AppUser,
    ports::{UserStore, UserStoreError, UserStoreResult},
};

/// Thread-safe in-memory user store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<Vec<AppUser>>>,
}

impl InMemoryUserStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given users.
    #[must_use]
    pub fn seeded(users: Vec<AppUser>) -> Self {
        Self {
            state: Arc::new(RwLock::new(users)),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn load(&self) -> UserStoreResult<Vec<AppUser>> {
        let state = self
            .state
            .read()
            .map_err(|err| UserStoreError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.clone())
    }

    async fn replace(&self, users: Vec<AppUser>) -> UserStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| UserStoreError::persistence(std::io::Error::other(err.to_string())))?;
        *state = users;
        Ok(())
    }
}
