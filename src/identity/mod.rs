//! Identity and role management for Changeflow.
//!
//! This module covers user registration with a privileged approval gate,
//! role-based privilege predicates, the login gate for unapproved accounts,
//! and lazy session materialization from identity-provider claims. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
