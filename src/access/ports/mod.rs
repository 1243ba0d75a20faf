//! Port contracts for access-meta persistence.

pub mod meta_store;

pub use meta_store::{MetaStore, MetaStoreError, MetaStoreResult};
