//! Filter hook bound to the account lifecycle events.

use std::sync::Arc;

use sso_core::{AuthEventMeta, AuthEventPayload, HookEvent, SsoError};

use crate::lookup::RoleLookup;
use crate::resolver::Resolver;

/// Resolver plus role store, ready to be registered on `auth.create` and
/// `auth.update`. Cloning shares the lookup.
#[derive(Clone)]
pub struct SsoHook {
    resolver: Resolver,
    lookup: Arc<dyn RoleLookup>,
}

impl SsoHook {
    pub fn new(resolver: Resolver, lookup: Arc<dyn RoleLookup>) -> Self {
        Self { resolver, lookup }
    }

    /// Events this hook must be registered on.
    #[must_use]
    pub const fn events() -> [HookEvent; 2] {
        HookEvent::ALL
    }

    /// Handle one event by name, as delivered by the host.
    ///
    /// # Errors
    ///
    /// `SsoError::UnsupportedEvent` for names other than `auth.create` and
    /// `auth.update`; otherwise whatever the resolver returns.
    pub async fn filter(
        &self,
        event: &str,
        payload: AuthEventPayload,
        meta: &AuthEventMeta,
    ) -> Result<AuthEventPayload, SsoError> {
        let event: HookEvent = event.parse()?;
        self.handle(event, payload, meta).await
    }

    /// Handle one typed event.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error; the host must abort the authentication.
    pub async fn handle(
        &self,
        event: HookEvent,
        payload: AuthEventPayload,
        meta: &AuthEventMeta,
    ) -> Result<AuthEventPayload, SsoError> {
        tracing::info!(%event, identifier = ?meta.identifier, "hook: filter handler executed");
        tracing::debug!(?payload, "hook: incoming payload");

        match self.resolver.resolve(payload, meta, self.lookup.as_ref()).await {
            Ok(payload) => {
                tracing::debug!(?payload, "hook: resolved payload");
                Ok(payload)
            }
            Err(error) => {
                tracing::warn!(
                    %event,
                    code = error.code(),
                    status = error.status(),
                    %error,
                    "hook: authentication rejected"
                );
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for SsoHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsoHook")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
