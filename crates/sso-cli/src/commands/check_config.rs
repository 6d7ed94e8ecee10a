use serde::Serialize;
use sso_config::SsoConfig;

use crate::cli::GlobalFlags;
use crate::commands::resolve::{RoleStoreKind, role_store_kind};
use crate::output::output;

#[derive(Debug, Serialize)]
struct ConfigReport {
    role_store: RoleStoreKind,
    config: SsoConfig,
}

/// Handle `sso-hook check-config`.
pub fn handle(config: &SsoConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let organization_id = config.require_organization_id()?;
    let role_store = role_store_kind(config);
    if role_store == RoleStoreKind::Unconfigured {
        tracing::warn!("check-config: no role store configured; every event will fail");
    }
    tracing::info!(%organization_id, ?role_store, "check-config: configuration is valid");

    output(
        &ConfigReport {
            role_store,
            config: config.redacted(),
        },
        flags.format,
    )
}
