//! Role identifiers, lookup records, and role-name normalization.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Internal role identifier. Role stores hand out either integers or
/// strings (UUIDs), so both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RoleId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RoleId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RoleId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for RoleId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// One row returned by a role lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RoleRecord {
    pub id: RoleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Canonical role name together with the identifier it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    pub name: String,
    pub id: RoleId,
}

/// Reduce a raw role claim to the canonical role name.
///
/// `"org1:school_admin"` → `"Admin"`, `"org1:Client"` → `"Client"`,
/// `"Admin"` → `"Admin"`. When the claim holds a `:` the second segment is
/// the token; a token with an `_` is namespaced and keeps only its second
/// segment, first letter upper-cased. Returns `None` when nothing is left.
#[must_use]
pub fn normalize_role_name(raw: &str) -> Option<String> {
    let mut segments = raw.split(':');
    let head = segments.next().unwrap_or_default();
    let token = segments.next().unwrap_or(head).trim();

    let name = if token.contains('_') {
        capitalize_first(token.split('_').nth(1).unwrap_or_default().trim())
    } else {
        token.to_string()
    };

    (!name.is_empty()).then_some(name)
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
