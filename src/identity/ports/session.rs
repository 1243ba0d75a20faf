//! Session port exposing the identity provider's current claims.

use crate::identity::domain::SessionClaims;
use async_trait::async_trait;

/// Contract for reading the current authenticated session.
///
/// Authentication mechanics stay inside the provider; the port only
/// surfaces the claims of the signed-in principal, or `None` when no
/// session is active.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns the claims for the active session, if any.
    async fn current_claims(&self) -> Option<SessionClaims>;
}
