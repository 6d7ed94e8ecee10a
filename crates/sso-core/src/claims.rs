//! Structured decoding of the provider attribute bag.
//!
//! The bag is scanned once; the resolver then works on [`OrgClaims`] instead
//! of re-matching key prefixes at every step.

use crate::user_info::ProviderUserInfo;

pub const ORGANIZATIONS_PREFIX: &str = "organizations.";
pub const ORGANIZATION_ROLES_PREFIX: &str = "organization_roles.";
pub const ROLES_KEY: &str = "roles";
pub const ROLES_PREFIX: &str = "roles.";
pub const NAME_KEY: &str = "name";
pub const IDENTIFICATION_KEY: &str = "custom_data.identification";

/// Index encoded by a key suffix: its first dotted segment, so both
/// `0` and a flattened nested `0.id` give `0`.
fn slot_index(slot: &str) -> Option<usize> {
    slot.split('.').next()?.parse().ok()
}

/// One `organizations.<slot>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipSlot {
    /// Key suffix after `organizations.`, normally a decimal index.
    pub slot: String,
    pub organization_id: String,
}

impl MembershipSlot {
    /// Numeric index of the slot, if the suffix starts with one.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        slot_index(&self.slot)
    }
}

/// One `organization_roles.<slot>` entry, `"<orgId>:<roleToken>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgRoleClaim {
    pub slot: String,
    pub raw: String,
    /// Text before the first `:`; `None` when the claim is not scoped.
    pub organization_id: Option<String>,
    /// Text after the first `:`, trimmed.
    pub token: String,
}

impl OrgRoleClaim {
    fn parse(slot: &str, raw: &str) -> Self {
        let (organization_id, token) = match raw.split_once(':') {
            Some((org, token)) => (Some(org.trim().to_string()), token.trim()),
            None => (None, raw.trim()),
        };
        Self {
            slot: slot.to_string(),
            raw: raw.to_string(),
            organization_id,
            token: token.to_string(),
        }
    }

    #[must_use]
    pub fn belongs_to(&self, organization_id: &str) -> bool {
        self.organization_id.as_deref() == Some(organization_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgClaims {
    pub memberships: Vec<MembershipSlot>,
    pub organization_roles: Vec<OrgRoleClaim>,
    /// Tokens from `roles` (comma/whitespace separated) and `roles.<n>`.
    pub roles: Vec<String>,
    pub name: Option<String>,
    pub identification: Option<String>,
}

impl OrgClaims {
    /// Decode the bag. Null entries are skipped; order is bag order.
    #[must_use]
    pub fn decode(info: &ProviderUserInfo) -> Self {
        let memberships = info
            .with_prefix(ORGANIZATIONS_PREFIX)
            .filter_map(|(slot, value)| {
                value.map(|organization_id| MembershipSlot {
                    slot: slot.to_string(),
                    organization_id: organization_id.to_string(),
                })
            })
            .collect();

        let organization_roles = info
            .with_prefix(ORGANIZATION_ROLES_PREFIX)
            .filter_map(|(slot, value)| value.map(|raw| OrgRoleClaim::parse(slot, raw)))
            .collect();

        let mut roles = Vec::new();
        for (key, value) in info.iter() {
            let Some(value) = value else { continue };
            if key == ROLES_KEY {
                roles.extend(
                    value
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|token| !token.is_empty())
                        .map(str::to_string),
                );
            } else if key.starts_with(ROLES_PREFIX) {
                let token = value.trim();
                if !token.is_empty() {
                    roles.push(token.to_string());
                }
            }
        }

        Self {
            memberships,
            organization_roles,
            roles,
            name: info.get(NAME_KEY).map(str::to_string),
            identification: info.get(IDENTIFICATION_KEY).map(str::to_string),
        }
    }

    /// First membership slot whose value equals `organization_id`.
    #[must_use]
    pub fn membership_for(&self, organization_id: &str) -> Option<&MembershipSlot> {
        self.memberships
            .iter()
            .find(|membership| membership.organization_id == organization_id)
    }

    /// The first role claim stored under `organization_roles.<index>`.
    #[must_use]
    pub fn role_at(&self, index: usize) -> Option<&OrgRoleClaim> {
        self.organization_roles
            .iter()
            .find(|claim| slot_index(&claim.slot) == Some(index))
    }
}
