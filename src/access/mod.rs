//! Task access and approval management for Changeflow.
//!
//! This module owns the per-task ownership and approval side-record, the
//! role-based visibility rules, the two-party approval gate, and the
//! reconciliation pass that keeps tasks and their side-records in sync when
//! the two collections drift apart. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Pure approval-engine functions in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
