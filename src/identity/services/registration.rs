//! Service layer for registration, the approval gate, and login gating.

use crate::identity::{
    domain::{AppUser, EmailAddress, IdentityError, Role, UserId, UserStatus},
    ports::{UserStore, UserStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Identity policy configuration.
///
/// Carries the single bootstrap account address that bypasses the
/// registration approval gate and the role assigned to profiles
/// materialized without usable role metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    bootstrap_email: EmailAddress,
    default_role: Role,
}

impl IdentityConfig {
    /// Creates a configuration with the given bootstrap address.
    #[must_use]
    pub const fn new(bootstrap_email: EmailAddress) -> Self {
        Self {
            bootstrap_email,
            default_role: Role::Client,
        }
    }

    /// Sets the role used when claims carry no usable role metadata.
    #[must_use]
    pub const fn with_default_role(mut self, role: Role) -> Self {
        self.default_role = role;
        self
    }

    /// Returns the bootstrap account address.
    #[must_use]
    pub const fn bootstrap_email(&self) -> &EmailAddress {
        &self.bootstrap_email
    }

    /// Returns the fallback role for materialized profiles.
    #[must_use]
    pub const fn default_role(&self) -> Role {
        self.default_role
    }

    /// Returns `true` when the address matches the bootstrap account.
    #[must_use]
    pub fn is_bootstrap(&self, email: &EmailAddress) -> bool {
        *email == self.bootstrap_email
    }
}

/// Request payload for registering a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    name: String,
    email: String,
    role: Role,
}

impl NewRegistration {
    /// Creates a registration request with the default client role.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: Role::Client,
        }
    }

    /// Sets the requested role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Decision on a pending registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationDecision {
    /// Approve the registration.
    Approve,
    /// Reject the registration, optionally recording a reason.
    Reject {
        /// Reason surfaced to the rejected user.
        reason: Option<String>,
    },
}

/// Service-level errors for identity operations.
#[derive(Debug, Error)]
pub enum IdentityServiceError {
    /// Domain validation or gating failed.
    #[error(transparent)]
    Domain(#[from] IdentityError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] UserStoreError),
}

/// Result type for identity service operations.
pub type IdentityServiceResult<T> = Result<T, IdentityServiceError>;

/// Registration and login-gate orchestration service.
#[derive(Clone)]
pub struct RegistrationService<U, C>
where
    U: UserStore,
    C: Clock + Send + Sync,
{
    store: Arc<U>,
    config: IdentityConfig,
    clock: Arc<C>,
}

impl<U, C> RegistrationService<U, C>
where
    U: UserStore,
    C: Clock + Send + Sync,
{
    /// Creates a new registration service.
    #[must_use]
    pub const fn new(store: Arc<U>, config: IdentityConfig, clock: Arc<C>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Registers a new user.
    ///
    /// Every registration starts `Pending` except the configured bootstrap
    /// address, which is created approved with the super user role.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError`] when the name or email fails
    /// validation, the email is already registered, or the store rejects
    /// persistence.
    pub async fn register(&self, request: NewRegistration) -> IdentityServiceResult<AppUser> {
        let email = EmailAddress::new(request.email)?;
        let mut users = self.store.load().await?;
        if find_by_email(&users, &email).is_some() {
            return Err(IdentityError::DuplicateEmail(email.to_string()).into());
        }

        let user = if self.config.is_bootstrap(&email) {
            AppUser::bootstrap(request.name, email, &*self.clock)?
        } else {
            AppUser::register(request.name, email, request.role, &*self.clock)?
        };

        users.push(user.clone());
        self.store.replace(users).await?;
        Ok(user)
    }

    /// Decides a pending registration.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::AccessDenied`] unless the actor is a super
    /// user, [`IdentityError::NotFound`] when the target does not exist,
    /// [`IdentityError::AlreadyDecided`] when the registration was already
    /// settled, or a store error when persistence fails.
    pub async fn decide(
        &self,
        actor: &AppUser,
        target_id: UserId,
        decision: RegistrationDecision,
    ) -> IdentityServiceResult<AppUser> {
        if !actor.is_super_user() {
            return Err(IdentityError::AccessDenied {
                action: "deciding user registrations",
            }
            .into());
        }

        let mut users = self.store.load().await?;
        let target = users
            .iter_mut()
            .find(|user| user.id() == target_id)
            .ok_or_else(|| IdentityError::NotFound(target_id.to_string()))?;

        match decision {
            RegistrationDecision::Approve => target.approve(actor.id(), &*self.clock)?,
            RegistrationDecision::Reject { reason } => {
                target.reject(actor.id(), reason, &*self.clock)?;
            }
        }

        let decided = target.clone();
        self.store.replace(users).await?;
        Ok(decided)
    }

    /// Authenticates an email through the registration gate.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotFound`] for unknown addresses,
    /// [`IdentityError::RegistrationPending`] for undecided accounts, and
    /// [`IdentityError::RegistrationRejected`] for rejected ones.
    pub async fn login(&self, email: &str) -> IdentityServiceResult<AppUser> {
        let users = self.store.load().await?;
        Ok(login_gate(&users, email)?)
    }
}

/// Finds a user by normalized email address.
#[must_use]
pub fn find_by_email<'a>(users: &'a [AppUser], email: &EmailAddress) -> Option<&'a AppUser> {
    users.iter().find(|user| user.email() == email)
}

/// Applies the login gate to a user snapshot.
///
/// Only approved accounts pass; pending and rejected accounts fail with
/// their specific messages.
///
/// # Errors
///
/// Returns [`IdentityError::NotFound`], [`IdentityError::RegistrationPending`],
/// or [`IdentityError::RegistrationRejected`] as appropriate.
pub fn login_gate(users: &[AppUser], email: &str) -> Result<AppUser, IdentityError> {
    let email = EmailAddress::new(email)?;
    let user = find_by_email(users, &email)
        .ok_or_else(|| IdentityError::NotFound(email.to_string()))?;

    match user.status() {
        UserStatus::Approved => Ok(user.clone()),
        UserStatus::Pending => Err(IdentityError::RegistrationPending),
        UserStatus::Rejected => Err(IdentityError::RegistrationRejected {
            reason: user.rejection_reason().map(str::to_owned),
        }),
    }
}
