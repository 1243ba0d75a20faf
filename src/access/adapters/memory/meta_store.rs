//! In-memory access-meta store for tests and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::access::{
    domain::TaskAccessMeta,
    ports::{MetaStore, MetaStoreError, MetaStoreResult},
};
use crate::workflow::domain::TaskId;

/// Thread-safe in-memory access-meta store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetaStore {
    state: Arc<RwLock<HashMap<TaskId, TaskAccessMeta>>>,
}

impl InMemoryMetaStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given side-records.
    #[must_use]
    pub fn seeded(metas: HashMap<TaskId, TaskAccessMeta>) -> Self {
        Self {
            state: Arc::new(RwLock::new(metas)),
        }
    }
}

#[async_trait]
impl MetaStore for InMemoryMetaStore {
    async fn load(&self) -> MetaStoreResult<HashMap<TaskId, TaskAccessMeta>> {
        let state = self
            .state
            .read()
            .map_err(|err| MetaStoreError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.clone())
    }

    async fn replace(&self, metas: HashMap<TaskId, TaskAccessMeta>) -> MetaStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| MetaStoreError::persistence(std::io::Error::other(err.to_string())))?;
        *state = metas;
        Ok(())
    }
}
