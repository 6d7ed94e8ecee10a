//! Error taxonomy for the SSO resolver.
//!
//! Every failure path of the resolution pipeline maps to exactly one
//! [`SsoError`] variant. Each variant carries a stable machine code and an
//! HTTP-like status so the host can surface it without string matching.

use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while resolving an authentication event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SsoError {
    /// `custom_data.identification` is missing or empty.
    #[error("The identification field is required. Please contact support")]
    IdentificationRequired,

    /// The provider metadata carries no user attributes.
    #[error("The user info is required. Please contact support")]
    UserInfoRequired,

    /// No membership matches the configured organization.
    #[error("The current user does not belong to this organization.")]
    WrongOrganization,

    /// No role source produced a role token.
    #[error("The user does not have a role assigned. Please contact support")]
    UserHasNoRole,

    /// The normalized role name has no match in the role store.
    #[error("Role not found for name: {name}")]
    RoleNotFound { name: String },

    /// The organization id is not configured. Fatal for the whole instance.
    #[error("BYTARS_ORGANIZATION_ID is not set")]
    MissingOrganizationId,

    /// The matching membership key does not end in a numeric index.
    #[error("Invalid user organization index: {slot}")]
    InvalidMembershipIndex { slot: String },

    /// Normalization left nothing of the raw role string.
    #[error("Role name could not be extracted from '{raw}'")]
    RoleNameUnextractable { raw: String },

    /// The role store could not be queried.
    #[error("Role lookup failed: {0}")]
    Lookup(String),

    /// The hook was invoked for an event it is not registered on.
    #[error("Unsupported hook event: {0}")]
    UnsupportedEvent(String),
}

impl SsoError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::IdentificationRequired => "IDENTIFICATION_NULL",
            Self::UserInfoRequired => "USER_INFO_NULL",
            Self::WrongOrganization => "WRONG_ORGANIZATION",
            Self::UserHasNoRole => "USER_HAS_NO_ROLE",
            Self::RoleNotFound { .. } => "ROLE_NOT_FOUND",
            Self::MissingOrganizationId => "CONFIGURATION_ERROR",
            Self::InvalidMembershipIndex { .. }
            | Self::RoleNameUnextractable { .. }
            | Self::Lookup(_)
            | Self::UnsupportedEvent(_) => "INTERNAL",
        }
    }

    /// HTTP-like status the host should answer with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::IdentificationRequired | Self::UserHasNoRole => 400,
            Self::WrongOrganization => 403,
            Self::RoleNotFound { .. } => 404,
            Self::UserInfoRequired
            | Self::MissingOrganizationId
            | Self::InvalidMembershipIndex { .. }
            | Self::RoleNameUnextractable { .. }
            | Self::Lookup(_)
            | Self::UnsupportedEvent(_) => 500,
        }
    }

    /// Configuration errors make every event fail; the instance must not serve.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingOrganizationId)
    }

    /// Whether the failure stems from end-user supplied data.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        let status = self.status();
        status >= 400 && status < 500
    }

    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            status: self.status(),
            message: self.to_string(),
        }
    }
}

/// Host-facing rendering of an [`SsoError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ErrorBody {
    pub code: String,
    pub status: u16,
    pub message: String,
}

impl From<&SsoError> for ErrorBody {
    fn from(error: &SsoError) -> Self {
        error.body()
    }
}
