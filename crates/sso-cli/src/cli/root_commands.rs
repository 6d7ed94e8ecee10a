use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use sso_core::HookEvent;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Resolve one authentication event read from a file or stdin.
    Resolve(ResolveArgs),
    /// Load and validate configuration, then print the effective settings.
    CheckConfig,
    /// Print the JSON Schema of an input or output document.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ResolveArgs {
    /// Lifecycle event the host fired.
    #[arg(short, long, default_value = "auth.create", value_parser = parse_event)]
    pub event: HookEvent,

    /// Event document (`{"payload": {...}, "meta": {...}}`); stdin when omitted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Document to describe.
    #[arg(value_enum)]
    pub document: SchemaDocument,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaDocument {
    /// Input of `resolve`.
    EventInput,
    /// The provider attribute bag.
    UserInfo,
    /// Fields `resolve` adds to the payload.
    AccountUpdate,
    /// Error body printed on failure.
    Error,
}

fn parse_event(value: &str) -> Result<HookEvent, String> {
    value.parse().map_err(|error: sso_core::SsoError| error.to_string())
}
