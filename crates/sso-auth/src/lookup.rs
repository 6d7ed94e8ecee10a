//! Role store seam.
//!
//! The resolver only needs "roles whose name is exactly X". Implementations
//! own their transport, timeouts and credentials.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use sso_core::{RoleId, RoleRecord};

use crate::error::LookupError;

#[async_trait]
pub trait RoleLookup: Send + Sync {
    /// Roles whose name equals `name` exactly. An empty list means no match.
    async fn find_by_name(&self, name: &str) -> Result<Vec<RoleRecord>, LookupError>;
}

#[async_trait]
impl<T: RoleLookup + ?Sized> RoleLookup for Arc<T> {
    async fn find_by_name(&self, name: &str) -> Result<Vec<RoleRecord>, LookupError> {
        (**self).find_by_name(name).await
    }
}

#[async_trait]
impl<T: RoleLookup + ?Sized> RoleLookup for Box<T> {
    async fn find_by_name(&self, name: &str) -> Result<Vec<RoleRecord>, LookupError> {
        (**self).find_by_name(name).await
    }
}

/// In-memory name → id table.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleLookup {
    roles: BTreeMap<String, RoleId>,
}

impl StaticRoleLookup {
    #[must_use]
    pub const fn new(roles: BTreeMap<String, RoleId>) -> Self {
        Self { roles }
    }

    #[must_use]
    pub fn with_role(mut self, name: impl Into<String>, id: impl Into<RoleId>) -> Self {
        self.roles.insert(name.into(), id.into());
        self
    }
}

#[async_trait]
impl RoleLookup for StaticRoleLookup {
    async fn find_by_name(&self, name: &str) -> Result<Vec<RoleRecord>, LookupError> {
        Ok(self
            .roles
            .get(name)
            .map(|id| RoleRecord {
                id: id.clone(),
                name: Some(name.to_string()),
            })
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn static_lookup_matches_exact_names_only() {
        let lookup = StaticRoleLookup::default()
            .with_role("Admin", 42_i64)
            .with_role("Client", "c-1");

        let admin = lookup.find_by_name("Admin").await.expect("lookup");
        assert_eq!(
            admin,
            vec![RoleRecord {
                id: RoleId::Int(42),
                name: Some("Admin".into())
            }]
        );
        assert!(lookup.find_by_name("admin").await.expect("lookup").is_empty());
    }

    #[tokio::test]
    async fn shared_lookup_delegates() {
        let lookup: Arc<dyn RoleLookup> =
            Arc::new(StaticRoleLookup::default().with_role("Admin", 1_i64));
        let found = lookup.find_by_name("Admin").await.expect("lookup");
        assert_eq!(found.len(), 1);
    }
}
