//! Application services for identity orchestration.

mod registration;
mod session;

pub use registration::{
    IdentityConfig, IdentityServiceError, IdentityServiceResult, NewRegistration,
    RegistrationDecision, RegistrationService, find_by_email, login_gate,
};
pub use session::{ResolvedSession, SessionService, materialize_profile};
