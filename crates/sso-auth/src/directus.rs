//! Role lookup against the CMS REST API.
//!
//! Calls `GET {url}/roles?filter[name][_eq]=<name>` directly via `reqwest`
//! with a static bearer token. The API answers `{"data": [...]}` for
//! collection reads; some deployments answer a single object instead, which
//! is folded into a one-element result.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sso_core::RoleRecord;

use crate::error::LookupError;
use crate::lookup::RoleLookup;

#[derive(Debug, Clone)]
pub struct DirectusRoleLookup {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl DirectusRoleLookup {
    /// Build a lookup for `base_url` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::NotConfigured` if the URL or token is empty, or
    /// the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, LookupError> {
        if base_url.trim().is_empty() || token.is_empty() {
            return Err(LookupError::NotConfigured(
                "role API url and token are required".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::NotConfigured(format!("http client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    fn roles_url(&self, name: &str) -> String {
        format!(
            "{base}/roles?filter[name][_eq]={name}&fields=id,name",
            base = self.base_url,
            name = urlencoding::encode(name)
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<RoleRecord>),
    One(RoleRecord),
}

#[derive(Deserialize)]
struct RolesResponse {
    #[serde(default)]
    data: Option<OneOrMany>,
}

#[async_trait]
impl RoleLookup for DirectusRoleLookup {
    async fn find_by_name(&self, name: &str) -> Result<Vec<RoleRecord>, LookupError> {
        let url = self.roles_url(name);
        tracing::debug!(role = %name, "roles: querying role API");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| LookupError::Http(format!("read roles: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::Status { status, body });
        }

        let parsed: RolesResponse = resp
            .json()
            .await
            .map_err(|e| LookupError::Decode(format!("parse roles: {e}")))?;

        Ok(match parsed.data {
            Some(OneOrMany::Many(records)) => records,
            Some(OneOrMany::One(record)) => vec![record],
            None => Vec::new(),
        })
    }
}
