use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sso_auth::{DirectusRoleLookup, Resolver, RoleLookup, SsoHook, StaticRoleLookup};
use sso_config::SsoConfig;
use sso_core::{AuthEventMeta, AuthEventPayload};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResolveArgs;
use crate::output::output;

/// Document read by `sso-hook resolve`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct EventInput {
    /// Account record as the host would commit it.
    #[serde(default)]
    pub payload: AuthEventPayload,
    #[serde(default)]
    pub meta: AuthEventMeta,
}

/// Which role store the configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStoreKind {
    Directus,
    Static,
    Unconfigured,
}

pub fn role_store_kind(config: &SsoConfig) -> RoleStoreKind {
    if config.directus.is_configured() {
        RoleStoreKind::Directus
    } else if !config.roles.is_empty() {
        RoleStoreKind::Static
    } else {
        RoleStoreKind::Unconfigured
    }
}

/// Handle `sso-hook resolve`.
///
/// Prints the augmented payload, or the error body before failing.
pub async fn handle(
    args: &ResolveArgs,
    config: &SsoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let input = read_input(args.input.as_deref())?;
    let hook = build_hook(config)?;

    match hook.handle(args.event, input.payload, &input.meta).await {
        Ok(payload) => output(&payload, flags.format),
        Err(error) => {
            output(&error.body(), flags.format)?;
            Err(anyhow::Error::new(error).context(format!("{} rejected", args.event)))
        }
    }
}

/// Read the event document from `path`, or stdin when `None`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<EventInput> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event from {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin())
            .context("failed to read event from stdin")?,
    };
    serde_json::from_str(&raw).context("event input is not a valid event document")
}

pub fn build_lookup(config: &SsoConfig) -> anyhow::Result<Arc<dyn RoleLookup>> {
    match role_store_kind(config) {
        RoleStoreKind::Directus => {
            let lookup = DirectusRoleLookup::new(
                &config.directus.url,
                &config.directus.token,
                Duration::from_secs(config.directus.timeout_secs),
            )?;
            Ok(Arc::new(lookup))
        }
        RoleStoreKind::Static => Ok(Arc::new(StaticRoleLookup::new(config.roles.clone()))),
        RoleStoreKind::Unconfigured => {
            bail!("no role store configured: set [directus] url and token, or a [roles] table")
        }
    }
}

pub fn build_hook(config: &SsoConfig) -> anyhow::Result<SsoHook> {
    let resolver = Resolver::new(config.organization_id.clone(), config.policy.clone());
    Ok(SsoHook::new(resolver, build_lookup(config)?))
}
