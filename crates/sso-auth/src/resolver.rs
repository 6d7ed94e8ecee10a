//! Role and identity resolution for one authentication event.
//!
//! The pipeline is strictly sequential; each step either proceeds or ends
//! the event with an [`SsoError`]:
//!
//! 1. organization id configured
//! 2. user info present
//! 3. membership in the organization (indexed list or direct field)
//! 4. role claim from the configured sources, first hit wins
//! 5. role-name normalization
//! 6. role lookup
//! 7. identification (when required)
//! 8. display-name split
//! 9. merge into the payload

use sso_core::{
    AccountUpdate, AuthEventMeta, AuthEventPayload, MembershipStrategy, OrgClaims, PersonName,
    ProviderUserInfo, ResolvedRole, ResolverPolicy, RoleSource, SsoError, normalize_role_name,
};

use crate::lookup::RoleLookup;

/// A role claim as found in the bag, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RoleClaim {
    /// `"<orgId>:<roleToken>"` from `organization_roles.<n>`.
    Scoped { raw: String, source: RoleSource },
    /// A configured canonical name, used verbatim.
    Canonical(String),
}

/// Resolver scoped to one organization. Holds no per-event state, so one
/// instance serves concurrent events.
#[derive(Debug, Clone)]
pub struct Resolver {
    organization_id: String,
    policy: ResolverPolicy,
}

impl Resolver {
    pub fn new(organization_id: impl Into<String>, policy: ResolverPolicy) -> Self {
        Self {
            organization_id: organization_id.into().trim().to_string(),
            policy,
        }
    }

    #[must_use]
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// Resolve the event and return `payload` with the derived fields merged in.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's [`SsoError`]; `payload` is dropped.
    pub async fn resolve<L>(
        &self,
        payload: AuthEventPayload,
        meta: &AuthEventMeta,
        lookup: &L,
    ) -> Result<AuthEventPayload, SsoError>
    where
        L: RoleLookup + ?Sized,
    {
        let update = self.derive(meta, lookup).await?;
        Ok(update.apply_to(payload))
    }

    /// Run the pipeline and return only the derived fields.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn derive<L>(
        &self,
        meta: &AuthEventMeta,
        lookup: &L,
    ) -> Result<AccountUpdate, SsoError>
    where
        L: RoleLookup + ?Sized,
    {
        if self.organization_id.is_empty() {
            tracing::error!("resolver: organization id is not configured");
            return Err(SsoError::MissingOrganizationId);
        }

        let info = match meta.user_info() {
            Some(info) if !info.is_empty() => info,
            _ => {
                tracing::error!("resolver: provider payload does not contain user info");
                return Err(SsoError::UserInfoRequired);
            }
        };
        tracing::debug!(user_info = ?info, "resolver: provider user info");

        let claims = OrgClaims::decode(info);

        tracing::info!(
            organization_id = %self.organization_id,
            strategy = %self.policy.membership,
            "resolver: checking the user organization"
        );
        let index = self.check_membership(info, &claims)?;

        let role = self.resolve_role(&claims, index, lookup).await?;
        tracing::info!(role = %role.name, role_id = %role.id, "resolver: role fetched");

        let identification = claims
            .identification
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        if self.policy.require_identification && identification.is_none() {
            tracing::warn!("resolver: identification is missing");
            return Err(SsoError::IdentificationRequired);
        }

        let name = PersonName::split(claims.name.as_deref());

        Ok(AccountUpdate {
            role: role.id,
            first_name: name.first_name,
            last_name: name.last_name,
            external_identifier: meta.identifier.clone(),
            identification,
        })
    }

    /// Steps 4–6: pick a claim, normalize it, look it up.
    async fn resolve_role<L>(
        &self,
        claims: &OrgClaims,
        index: Option<usize>,
        lookup: &L,
    ) -> Result<ResolvedRole, SsoError>
    where
        L: RoleLookup + ?Sized,
    {
        let claim = self.extract_role_claim(claims, index).ok_or_else(|| {
            tracing::warn!(
                organization_id = %self.organization_id,
                "resolver: user has no role for the organization"
            );
            SsoError::UserHasNoRole
        })?;

        let name = match claim {
            RoleClaim::Scoped { raw, source } => {
                tracing::info!(raw_role = %raw, %source, "resolver: raw role from user info");
                normalize_role_name(&raw).ok_or(SsoError::RoleNameUnextractable { raw })?
            }
            RoleClaim::Canonical(name) => {
                tracing::info!(role = %name, "resolver: canonical role from roles claim");
                name
            }
        };
        tracing::info!(role = %name, "resolver: role name parsed");

        let records = lookup.find_by_name(&name).await.map_err(|error| {
            tracing::error!(role = %name, %error, "resolver: role lookup failed");
            SsoError::from(error)
        })?;

        let Some(record) = records.into_iter().next() else {
            tracing::error!(role = %name, "resolver: role not found");
            return Err(SsoError::RoleNotFound { name });
        };
        Ok(ResolvedRole {
            name,
            id: record.id,
        })
    }

    /// Step 3. Returns the membership index when the strategy yields one.
    fn check_membership(
        &self,
        info: &ProviderUserInfo,
        claims: &OrgClaims,
    ) -> Result<Option<usize>, SsoError> {
        match self.policy.membership {
            MembershipStrategy::IndexedList => {
                let Some(membership) = claims.membership_for(&self.organization_id) else {
                    tracing::error!(
                        organization_id = %self.organization_id,
                        "resolver: user does not belong to the organization"
                    );
                    return Err(SsoError::WrongOrganization);
                };
                let index = membership.index().ok_or_else(|| {
                    tracing::error!(slot = %membership.slot, "resolver: invalid organization index");
                    SsoError::InvalidMembershipIndex {
                        slot: membership.slot.clone(),
                    }
                })?;
                Ok(Some(index))
            }
            MembershipStrategy::DirectField => {
                let key = self.policy.direct_field_key.as_str();
                match info.get(key).map(str::trim) {
                    Some(value) if value == self.organization_id => Ok(None),
                    found => {
                        tracing::error!(
                            organization_id = %self.organization_id,
                            field = key,
                            found = ?found,
                            "resolver: organization field does not match"
                        );
                        Err(SsoError::WrongOrganization)
                    }
                }
            }
        }
    }

    fn extract_role_claim(&self, claims: &OrgClaims, index: Option<usize>) -> Option<RoleClaim> {
        self.policy.role_sources.iter().find_map(|source| match source {
            RoleSource::Aligned => index
                .and_then(|index| claims.role_at(index))
                .filter(|claim| !claim.raw.trim().is_empty())
                .map(|claim| RoleClaim::Scoped {
                    raw: claim.raw.clone(),
                    source: RoleSource::Aligned,
                }),
            RoleSource::SchoolScan => claims
                .organization_roles
                .iter()
                .find(|claim| {
                    claim.belongs_to(&self.organization_id)
                        && claim.token.starts_with(&self.policy.school_role_prefix)
                })
                .map(|claim| RoleClaim::Scoped {
                    raw: claim.raw.clone(),
                    source: RoleSource::SchoolScan,
                }),
            RoleSource::RolesFallback => claims.roles.iter().find_map(|token| {
                let token = normalize_role_name(token)?;
                self.policy
                    .fallback_roles
                    .iter()
                    .find(|canonical| canonical.eq_ignore_ascii_case(&token))
                    .map(|canonical| RoleClaim::Canonical(canonical.clone()))
            }),
        })
    }
}
