//! Step definitions for the change request workflow feature.

mod given;
mod then;
mod when;
pub mod world;
