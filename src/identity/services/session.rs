//! Service layer for session resolution and lazy profile materialization.

use super::registration::{IdentityConfig, IdentityServiceResult, find_by_email};
use crate::identity::{
    domain::{
        AppUser, EmailAddress, IdentityError, PersistedUserData, Role, SessionClaims, UserId,
        UserStatus,
    },
    ports::{SessionProvider, UserStore},
};
use mockable::Clock;
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of resolving the current session against stored profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    /// The profile matching the session claims.
    pub user: AppUser,
    /// `true` when the profile was materialized during this resolution.
    pub materialized: bool,
}

/// Session resolution service.
///
/// Locates the stored profile for the provider's current claims, lazily
/// materializing one when the profile collection has drifted behind the
/// provider (for example after an import or a provider-side signup).
#[derive(Clone)]
pub struct SessionService<U, P, C>
where
    U: UserStore,
    P: SessionProvider,
    C: Clock + Send + Sync,
{
    store: Arc<U>,
    provider: Arc<P>,
    config: IdentityConfig,
    clock: Arc<C>,
}

impl<U, P, C> SessionService<U, P, C>
where
    U: UserStore,
    P: SessionProvider,
    C: Clock + Send + Sync,
{
    /// Creates a new session service.
    #[must_use]
    pub const fn new(store: Arc<U>, provider: Arc<P>, config: IdentityConfig, clock: Arc<C>) -> Self {
        Self {
            store,
            provider,
            config,
            clock,
        }
    }

    /// Resolves the current session to a stored profile.
    ///
    /// Returns `Ok(None)` when no session is active. When the claims match
    /// no stored profile, a profile is materialized from the claims,
    /// persisted, and returned with `materialized = true`.
    ///
    /// # Errors
    ///
    /// Returns [`super::IdentityServiceError`] when the claims carry an
    /// unusable email or the store fails.
    pub async fn resolve(&self) -> IdentityServiceResult<Option<ResolvedSession>> {
        let Some(claims) = self.provider.current_claims().await else {
            return Ok(None);
        };

        let mut users = self.store.load().await?;
        if let Some(user) = find_by_claims(&users, &claims) {
            return Ok(Some(ResolvedSession {
                user: user.clone(),
                materialized: false,
            }));
        }

        let user = materialize_profile(&claims, &self.config, &*self.clock)?;
        tracing::warn!(
            subject = %claims.subject_id,
            email = %user.email(),
            "no stored profile for session claims; materializing one"
        );
        users.push(user.clone());
        self.store.replace(users).await?;
        Ok(Some(ResolvedSession {
            user,
            materialized: true,
        }))
    }
}

/// Finds the stored profile matching session claims by id, then by email.
fn find_by_claims<'a>(users: &'a [AppUser], claims: &SessionClaims) -> Option<&'a AppUser> {
    if let Some(subject) = parse_subject(claims) {
        if let Some(user) = users.iter().find(|user| user.id() == subject) {
            return Some(user);
        }
    }
    let email = EmailAddress::new(claims.email.clone()).ok()?;
    find_by_email(users, &email)
}

/// Parses the provider subject as a profile id when it is a UUID.
fn parse_subject(claims: &SessionClaims) -> Option<UserId> {
    Uuid::parse_str(claims.subject_id.trim())
        .ok()
        .map(UserId::from_uuid)
}

/// Builds a profile from session claims.
///
/// The role comes from the claims' role metadata, defaulting to the
/// configured fallback on missing or unknown values. The bootstrap address
/// materializes approved; everyone else enters the registration gate as
/// `Pending`.
///
/// # Errors
///
/// Returns [`IdentityError::InvalidEmail`] when the claims carry an
/// unusable address, or [`IdentityError::EmptyName`] when neither the name
/// claim nor the address yields a display name.
pub fn materialize_profile(
    claims: &SessionClaims,
    config: &IdentityConfig,
    clock: &impl Clock,
) -> Result<AppUser, IdentityError> {
    let email = EmailAddress::new(claims.email.clone())?;
    let name = claims
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| fallback_name(&email));
    let role = claims
        .role_hint
        .as_deref()
        .and_then(|hint| Role::try_from(hint).ok())
        .unwrap_or_else(|| config.default_role());

    if config.is_bootstrap(&email) {
        return AppUser::bootstrap(name, email, clock);
    }

    let trimmed = name.trim().to_owned();
    if trimmed.is_empty() {
        return Err(IdentityError::EmptyName);
    }

    // Keep the provider's subject id as the profile id when it is a UUID so
    // subsequent resolutions match by id.
    Ok(AppUser::from_persisted(PersistedUserData {
        id: parse_subject(claims).unwrap_or_default(),
        name: trimmed,
        email,
        role,
        status: UserStatus::Pending,
        created_at: clock.utc(),
        approved_by_user_id: None,
        approved_at: None,
        rejection_reason: None,
    }))
}

/// Derives a display name from the address's local part.
fn fallback_name(email: &EmailAddress) -> String {
    email
        .as_str()
        .split('@')
        .next()
        .unwrap_or(email.as_str())
        .to_owned()
}
