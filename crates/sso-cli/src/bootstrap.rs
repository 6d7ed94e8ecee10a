use std::path::PathBuf;

use anyhow::Context;

use crate::cli::GlobalFlags;

/// Project root from `--project`, else the current directory.
pub fn project_root(flags: &GlobalFlags) -> anyhow::Result<PathBuf> {
    match flags.project.as_deref() {
        Some(path) => Ok(PathBuf::from(path)),
        None => std::env::current_dir().context("failed to determine current directory"),
    }
}

/// Load `.env` and the layered configuration for the project root.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<sso_config::SsoConfig> {
    let root = project_root(flags)?;
    sso_config::SsoConfig::load_with_dotenv(&root)
        .with_context(|| format!("failed to load configuration for {}", root.display()))
}
