//! # sso-auth
//!
//! Role and identity resolution for SSO account events.
//!
//! Provides the resolution pipeline ([`Resolver`]), the role store seam
//! ([`RoleLookup`]) with a static table and a REST implementation (`reqwest`),
//! and the filter hook ([`SsoHook`]) registered on `auth.create` /
//! `auth.update`.

pub mod directus;
pub mod error;
pub mod hook;
pub mod lookup;
pub mod resolver;

pub use directus::DirectusRoleLookup;
pub use error::LookupError;
pub use hook::SsoHook;
pub use lookup::{RoleLookup, StaticRoleLookup};
pub use resolver::Resolver;
