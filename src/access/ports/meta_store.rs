//! Access-meta store port.

use crate::access::domain::TaskAccessMeta;
use crate::workflow::domain::TaskId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for meta store operations.
pub type MetaStoreResult<T> = Result<T, MetaStoreError>;

/// Access-meta persistence contract.
///
/// Side-records are persisted as a whole collection keyed by task id; the
/// reconciliation pass reads and writes the full map, so the contract stays
/// a plain load/replace pair.
#[async_trait]
pub trait MetaStore: Send + Sync {
    /// Loads all side-records keyed by task id.
    async fn load(&self) -> MetaStoreResult<HashMap<TaskId, TaskAccessMeta>>;

    /// Replaces the stored side-record collection.
    async fn replace(&self, metas: HashMap<TaskId, TaskAccessMeta>) -> MetaStoreResult<()>;
}

/// Errors returned by meta store implementations.
#[derive(Debug, Clone, Error)]
pub enum MetaStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MetaStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
