//! Application user aggregate and role/status types.

use super::{EmailAddress, IdentityError, ParseRoleError, ParseUserStatusError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Privilege role, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Requests tasks and sees only their own.
    Client,
    /// Manages the delivery workflow across all tasks.
    Admin,
    /// Full privilege, including approval decisions on tasks and users.
    SuperUser,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Admin => "admin",
            Self::SuperUser => "super_user",
        }
    }

    /// Returns `true` for roles privileged over clients.
    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Admin | Self::SuperUser)
    }

    /// Returns `true` for the highest-privilege role.
    #[must_use]
    pub const fn is_super_user(self) -> bool {
        matches!(self, Self::SuperUser)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "client" => Ok(Self::Client),
            "admin" => Ok(Self::Admin),
            "super_user" | "super user" => Ok(Self::SuperUser),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Registration approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Awaiting an approval decision.
    Pending,
    /// Approved; the user may authenticate.
    Approved,
    /// Rejected; the user may not authenticate.
    Rejected,
}

impl UserStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for UserStatus {
    type Error = ParseUserStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseUserStatusError(value.to_owned())),
        }
    }
}

/// Registered application user aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    id: UserId,
    name: String,
    email: EmailAddress,
    role: Role,
    status: UserStatus,
    created_at: DateTime<Utc>,
    approved_by_user_id: Option<UserId>,
    approved_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: String,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted privilege role.
    pub role: Role,
    /// Persisted registration status.
    pub status: UserStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted approver linkage, if decided.
    pub approved_by_user_id: Option<UserId>,
    /// Persisted decision timestamp, if decided.
    pub approved_at: Option<DateTime<Utc>>,
    /// Persisted rejection reason, if rejected with one.
    pub rejection_reason: Option<String>,
}

impl AppUser {
    /// Registers a new user in the `Pending` state.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::EmptyName`] when the name is blank.
    pub fn register(
        name: impl Into<String>,
        email: EmailAddress,
        role: Role,
        clock: &impl Clock,
    ) -> Result<Self, IdentityError> {
        let name = validate_name(name)?;
        Ok(Self {
            id: UserId::new(),
            name,
            email,
            role,
            status: UserStatus::Pending,
            created_at: clock.utc(),
            approved_by_user_id: None,
            approved_at: None,
            rejection_reason: None,
        })
    }

    /// Registers the bootstrap account, approved immediately.
    ///
    /// The bootstrap account carries the super user role and records itself
    /// as its own approver so the approval invariant holds from the start.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::EmptyName`] when the name is blank.
    pub fn bootstrap(
        name: impl Into<String>,
        email: EmailAddress,
        clock: &impl Clock,
    ) -> Result<Self, IdentityError> {
        let name = validate_name(name)?;
        let id = UserId::new();
        let timestamp = clock.utc();
        Ok(Self {
            id,
            name,
            email,
            role: Role::SuperUser,
            status: UserStatus::Approved,
            created_at: timestamp,
            approved_by_user_id: Some(id),
            approved_at: Some(timestamp),
            rejection_reason: None,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            role: data.role,
            status: data.status,
            created_at: data.created_at,
            approved_by_user_id: data.approved_by_user_id,
            approved_at: data.approved_at,
            rejection_reason: data.rejection_reason,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the privilege role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the registration status.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the approver's user id, if decided.
    #[must_use]
    pub const fn approved_by_user_id(&self) -> Option<UserId> {
        self.approved_by_user_id
    }

    /// Returns the decision timestamp, if decided.
    #[must_use]
    pub const fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    /// Returns the rejection reason, if rejected with one.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns `true` for admin and super user accounts.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        self.role.is_manager()
    }

    /// Returns `true` for super user accounts.
    #[must_use]
    pub const fn is_super_user(&self) -> bool {
        self.role.is_super_user()
    }

    /// Approves a pending registration.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::AlreadyDecided`] when the registration is
    /// not pending.
    pub fn approve(&mut self, approver: UserId, clock: &impl Clock) -> Result<(), IdentityError> {
        self.require_pending()?;
        self.status = UserStatus::Approved;
        self.approved_by_user_id = Some(approver);
        self.approved_at = Some(clock.utc());
        self.rejection_reason = None;
        Ok(())
    }

    /// Rejects a pending registration, recording the reason if given.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::AlreadyDecided`] when the registration is
    /// not pending.
    pub fn reject(
        &mut self,
        approver: UserId,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), IdentityError> {
        self.require_pending()?;
        self.status = UserStatus::Rejected;
        self.approved_by_user_id = Some(approver);
        self.approved_at = Some(clock.utc());
        self.rejection_reason = reason;
        Ok(())
    }

    /// Guards decision methods against re-deciding a settled registration.
    const fn require_pending(&self) -> Result<(), IdentityError> {
        if !matches!(self.status, UserStatus::Pending) {
            return Err(IdentityError::AlreadyDecided(self.id));
        }
        Ok(())
    }
}

/// Trims and validates a display name.
fn validate_name(name: impl Into<String>) -> Result<String, IdentityError> {
    let trimmed = name.into().trim().to_owned();
    if trimmed.is_empty() {
        return Err(IdentityError::EmptyName);
    }
    Ok(trimmed)
}
