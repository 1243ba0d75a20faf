//! Domain model for identity and role management.
//!
//! The identity domain models registered application users, their privilege
//! roles, the registration approval gate, and the claims supplied by the
//! external identity provider, while keeping provider mechanics outside the
//! domain boundary.

mod claims;
mod error;
mod ids;
mod user;

pub use claims::SessionClaims;
pub use error::{IdentityError, ParseRoleError, ParseUserStatusError};
pub use ids::{EmailAddress, UserId};
pub use user::{AppUser, PersistedUserData, Role, UserStatus};
