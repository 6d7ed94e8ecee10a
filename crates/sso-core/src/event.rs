//! Hook event envelope: which event fired, what the host passed in, and the
//! fields the resolver writes back.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SsoError;
use crate::role::RoleId;
use crate::user_info::ProviderUserInfo;

/// The account record under creation or update. Opaque to the resolver
/// apart from the fields written by [`AccountUpdate::apply_to`].
pub type AuthEventPayload = Map<String, Value>;

/// Authentication lifecycle events the resolver is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum HookEvent {
    #[serde(rename = "auth.create")]
    AuthCreate,
    #[serde(rename = "auth.update")]
    AuthUpdate,
}

impl HookEvent {
    pub const ALL: [Self; 2] = [Self::AuthCreate, Self::AuthUpdate];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthCreate => "auth.create",
            Self::AuthUpdate => "auth.update",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = SsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| SsoError::UnsupportedEvent(s.to_string()))
    }
}

/// Event metadata supplied by the host alongside the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthEventMeta {
    /// External account identifier assigned by the identity provider.
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub provider_payload: ProviderPayload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPayload {
    #[serde(default)]
    pub user_info: Option<ProviderUserInfo>,
}

impl AuthEventMeta {
    #[must_use]
    pub fn user_info(&self) -> Option<&ProviderUserInfo> {
        self.provider_payload.user_info.as_ref()
    }
}

/// Fields derived for the account, merged into the payload on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AccountUpdate {
    pub role: RoleId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub external_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification: Option<String>,
}

impl AccountUpdate {
    /// Merge into `payload`; derived fields overwrite same-named ones.
    #[must_use]
    pub fn apply_to(self, mut payload: AuthEventPayload) -> AuthEventPayload {
        let to_value = |text: Option<String>| text.map_or(Value::Null, Value::String);

        let role = match self.role {
            RoleId::Int(id) => Value::from(id),
            RoleId::Text(id) => Value::String(id),
        };
        payload.insert("role".into(), role);
        payload.insert("first_name".into(), to_value(self.first_name));
        payload.insert("last_name".into(), to_value(self.last_name));
        payload.insert(
            "external_identifier".into(),
            to_value(self.external_identifier),
        );
        if let Some(identification) = self.identification {
            payload.insert("identification".into(), Value::String(identification));
        }
        payload
    }
}
