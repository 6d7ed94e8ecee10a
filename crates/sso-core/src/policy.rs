//! Resolver policy switches.
//!
//! Identity providers in the field disagree on where membership and role
//! claims live. The policy selects one membership strategy and an ordered
//! list of role sources; the defaults match the indexed payload shape.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DIRECT_FIELD_KEY: &str = "organization_data.0.id";
pub const DEFAULT_SCHOOL_ROLE_PREFIX: &str = "school_";
pub const DEFAULT_FALLBACK_ROLES: [&str; 2] = ["Client", "Admin"];

// ---------------------------------------------------------------------------
// MembershipStrategy
// ---------------------------------------------------------------------------

/// How organization membership is established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStrategy {
    /// Scan `organizations.<n>` and capture the index of the matching slot.
    #[default]
    IndexedList,
    /// Compare a single known key against the organization id.
    DirectField,
}

impl MembershipStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IndexedList => "indexed_list",
            Self::DirectField => "direct_field",
        }
    }
}

impl fmt::Display for MembershipStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RoleSource
// ---------------------------------------------------------------------------

/// One place a role claim may be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    /// `organization_roles.<index>` at the membership index.
    Aligned,
    /// First `organization_roles.<n>` for the organization with a school token.
    SchoolScan,
    /// A canonical role name in the flat or indexed `roles` claim.
    RolesFallback,
}

impl RoleSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aligned => "aligned",
            Self::SchoolScan => "school_scan",
            Self::RolesFallback => "roles_fallback",
        }
    }
}

impl fmt::Display for RoleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ResolverPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ResolverPolicy {
    pub membership: MembershipStrategy,
    /// Key read by [`MembershipStrategy::DirectField`].
    pub direct_field_key: String,
    /// Tried in order; the first source yielding a claim wins.
    pub role_sources: Vec<RoleSource>,
    pub school_role_prefix: String,
    /// Canonical names accepted by [`RoleSource::RolesFallback`].
    pub fallback_roles: Vec<String>,
    pub require_identification: bool,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            membership: MembershipStrategy::default(),
            direct_field_key: DEFAULT_DIRECT_FIELD_KEY.to_string(),
            role_sources: vec![
                RoleSource::Aligned,
                RoleSource::SchoolScan,
                RoleSource::RolesFallback,
            ],
            school_role_prefix: DEFAULT_SCHOOL_ROLE_PREFIX.to_string(),
            fallback_roles: DEFAULT_FALLBACK_ROLES.map(String::from).to_vec(),
            require_identification: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_follow_indexed_payloads() {
        let policy = ResolverPolicy::default();
        assert_eq!(policy.membership, MembershipStrategy::IndexedList);
        assert_eq!(
            policy.role_sources,
            [
                RoleSource::Aligned,
                RoleSource::SchoolScan,
                RoleSource::RolesFallback
            ]
        );
        assert_eq!(policy.fallback_roles, ["Client", "Admin"]);
        assert!(policy.require_identification);
    }

    #[test]
    fn partial_policy_fills_defaults() {
        let policy: ResolverPolicy = serde_json::from_value(json!({
            "membership": "direct_field",
            "role_sources": ["roles_fallback"]
        }))
        .expect("policy");

        assert_eq!(policy.membership, MembershipStrategy::DirectField);
        assert_eq!(policy.role_sources, [RoleSource::RolesFallback]);
        assert_eq!(policy.direct_field_key, DEFAULT_DIRECT_FIELD_KEY);
        assert_eq!(policy.school_role_prefix, DEFAULT_SCHOOL_ROLE_PREFIX);
    }

    #[test]
    fn display_matches_serde_names() {
        assert_eq!(MembershipStrategy::DirectField.to_string(), "direct_field");
        assert_eq!(RoleSource::SchoolScan.to_string(), "school_scan");
        let value = serde_json::to_value(RoleSource::SchoolScan).expect("serialize");
        assert_eq!(value, json!("school_scan"));
    }
}
