//! # sso-core
//!
//! Core types and error taxonomy for the SSO role resolver.
//!
//! This crate provides the data model shared by the resolver, the
//! configuration layer and the CLI adapter:
//! - The provider attribute bag and its flattening rules
//! - Structured decoding of organization memberships and role claims
//! - Role identifiers, lookup records, and role-name normalization
//! - Display-name splitting
//! - Resolver policy switches
//! - Hook event envelope types
//! - The unified `SsoError` enum
//!
//! Nothing in here performs I/O.

pub mod claims;
pub mod errors;
pub mod event;
pub mod names;
pub mod policy;
pub mod role;
pub mod user_info;

pub use claims::OrgClaims;
pub use errors::{ErrorBody, SsoError};
pub use event::{AccountUpdate, AuthEventMeta, AuthEventPayload, HookEvent, ProviderPayload};
pub use names::PersonName;
pub use policy::{MembershipStrategy, ResolverPolicy, RoleSource};
pub use role::{ResolvedRole, RoleId, RoleRecord, normalize_role_name};
pub use user_info::ProviderUserInfo;
