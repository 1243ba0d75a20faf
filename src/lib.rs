//! Changeflow: client change-request delivery workflow engine.
//!
//! This crate tracks client change requests through a multi-stage delivery
//! workflow with role-gated editing, two-tier approval (task-level and
//! user-registration-level), and derived time/cost accounting.
//!
//! # Architecture
//!
//! Changeflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (stores, sessions)
//!
//! # Modules
//!
//! - [`identity`]: Users, roles, registration approval, session resolution
//! - [`access`]: Task ownership, approval side-records, visibility rules
//! - [`workflow`]: Status model, task aggregate, workflow engine, interchange

pub mod access;
pub mod identity;
pub mod workflow;
