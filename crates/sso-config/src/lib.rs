//! # sso-config
//!
//! Layered configuration loading for the SSO resolver using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`BYTARS_*` prefix, `__` as separator)
//! 2. Project-level `.bytars/sso.toml`
//! 3. User-level `~/.config/bytars/sso.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `BYTARS_ORGANIZATION_ID` -> `organization_id`,
//! `BYTARS_POLICY__REQUIRE_IDENTIFICATION` -> `policy.require_identification`,
//! `BYTARS_DIRECTUS__TOKEN` -> `directus.token`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sso_config::SsoConfig;
//!
//! let config = SsoConfig::load_with_dotenv(std::path::Path::new(".")).expect("config");
//! let organization_id = config.require_organization_id().expect("organization id");
//! println!("resolving roles for {organization_id}");
//! ```

mod directus;
mod error;
mod text;

pub use directus::DirectusConfig;
pub use error::ConfigError;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use sso_core::{ResolverPolicy, RoleId, RoleSource};

pub const ENV_PREFIX: &str = "BYTARS_";
pub const ORGANIZATION_ID_ENV: &str = "BYTARS_ORGANIZATION_ID";

/// Text settings read verbatim from the environment, so ids like `007`
/// are not parsed into numbers first.
const RAW_ENV_KEYS: [(&str, &str); 3] = [
    ("organization_id", ORGANIZATION_ID_ENV),
    ("directus.url", "BYTARS_DIRECTUS__URL"),
    ("directus.token", "BYTARS_DIRECTUS__TOKEN"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SsoConfig {
    /// Organization every account must belong to.
    #[serde(default, deserialize_with = "text::deserialize")]
    pub organization_id: String,
    #[serde(default)]
    pub policy: ResolverPolicy,
    #[serde(default)]
    pub directus: DirectusConfig,
    /// Static role table used when no role API is configured.
    #[serde(default)]
    pub roles: BTreeMap<String, RoleId>,
}

impl SsoConfig {
    /// Load from the current directory's layers plus environment variables.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for_project(Path::new("."))
    }

    /// Load with `project_root/.bytars/sso.toml` as the project layer.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `project_root/.env` (falling back to the usual `.env` search)
    /// before building the figment.
    pub fn load_with_dotenv(project_root: &Path) -> Result<Self, ConfigError> {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        } else {
            let _ = dotenvy::dotenv();
        }
        Self::load_for_project(project_root)
    }

    /// Build the figment provider chain for the current directory.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = Self::project_config_path(project_root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        for (key, var) in RAW_ENV_KEYS {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    /// The configured organization id, or the fatal configuration error.
    pub fn require_organization_id(&self) -> Result<&str, ConfigError> {
        let organization_id = self.organization_id.trim();
        if organization_id.is_empty() {
            return Err(ConfigError::NotConfigured {
                key: "organization_id".into(),
                env: ORGANIZATION_ID_ENV.into(),
            });
        }
        Ok(organization_id)
    }

    /// Copy safe to print: secrets replaced.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.directus.token.is_empty() {
            copy.directus.token = "***".into();
        }
        copy
    }

    /// Policy sanity checks that serde alone cannot express.
    fn validate(&self) -> Result<(), ConfigError> {
        let policy = &self.policy;
        if policy.role_sources.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "policy.role_sources".into(),
                reason: "at least one role source is required".into(),
            });
        }
        if policy.role_sources.contains(&RoleSource::SchoolScan)
            && policy.school_role_prefix.is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "policy.school_role_prefix".into(),
                reason: "must not be empty while school_scan is enabled".into(),
            });
        }
        if policy.role_sources.contains(&RoleSource::RolesFallback)
            && policy.fallback_roles.is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "policy.fallback_roles".into(),
                reason: "must not be empty while roles_fallback is enabled".into(),
            });
        }
        if self.directus.is_configured() && self.directus.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "directus.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bytars").join("sso.toml"))
    }

    fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(".bytars").join("sso.toml")
    }
}
