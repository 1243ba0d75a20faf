//! Delivery workflow management for Changeflow.
//!
//! This module implements the core of the system: the ordered status model
//! with its single transition rule, the `ProjectTask` aggregate with
//! append-only history and hour-revision ledgers, the workflow engine that
//! validates and commits transitions, edits, and hour updates, derived cost
//! accounting, and the JSON interchange layer. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Import/export codecs in [`interchange`]

pub mod adapters;
pub mod domain;
pub mod interchange;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
