//! Fixed-claims session provider for tests and local tooling.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::identity::{domain::SessionClaims, ports::SessionProvider};

/// Session provider returning a configurable, fixed set of claims.
#[derive(Debug, Clone, Default)]
pub struct FixedSessionProvider {
    claims: Arc<RwLock<Option<SessionClaims>>>,
}

impl FixedSessionProvider {
    /// Creates a provider with no active session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Creates a provider with an active session for the given claims.
    #[must_use]
    pub fn signed_in(claims: SessionClaims) -> Self {
        Self {
            claims: Arc::new(RwLock::new(Some(claims))),
        }
    }

    /// Replaces the active session claims.
    pub fn set_claims(&self, claims: Option<SessionClaims>) {
        if let Ok(mut state) = self.claims.write() {
            *state = claims;
        }
    }
}

#[async_trait]
impl SessionProvider for FixedSessionProvider {
    async fn current_claims(&self) -> Option<SessionClaims> {
        self.claims.read().ok().and_then(|state| state.clone())
    }
}
