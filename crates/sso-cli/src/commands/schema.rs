use schemars::schema_for;
use sso_core::{AccountUpdate, ErrorBody, ProviderUserInfo};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaDocument};
use crate::commands::resolve::EventInput;
use crate::output::output;

/// Handle `sso-hook schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.document {
        SchemaDocument::EventInput => schema_for!(EventInput),
        SchemaDocument::UserInfo => schema_for!(ProviderUserInfo),
        SchemaDocument::AccountUpdate => schema_for!(AccountUpdate),
        SchemaDocument::Error => schema_for!(ErrorBody),
    };
    output(&schema, flags.format)
}
