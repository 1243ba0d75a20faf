//! Claims supplied by the external identity provider.

use serde::{Deserialize, Serialize};

/// Snapshot of the identity provider's session claims.
///
/// The provider owns authentication; the domain only consumes the subject
/// identifier and profile metadata needed to locate or lazily materialize an
/// [`super::AppUser`]. Role metadata is a free-form hint because providers
/// store it as untyped user metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Provider-side subject identifier (a UUID for providers that share the
    /// profile id, otherwise opaque).
    pub subject_id: String,
    /// Email address asserted by the provider.
    pub email: String,
    /// Display name from provider metadata, if present.
    pub name: Option<String>,
    /// Role string from provider metadata, if present.
    pub role_hint: Option<String>,
}

impl SessionClaims {
    /// Creates claims with the required subject and email fields.
    #[must_use]
    pub fn new(subject_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
            name: None,
            role_hint: None,
        }
    }

    /// Sets the display name claim.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the role metadata claim.
    #[must_use]
    pub fn with_role_hint(mut self, role_hint: impl Into<String>) -> Self {
        self.role_hint = Some(role_hint.into());
        self
    }
}
