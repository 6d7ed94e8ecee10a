//! Serde helper for text settings that may arrive as scalars.
//!
//! Identifiers and tokens are opaque text, but a TOML file may spell
//! `organization_id = 12345` and figment parses environment values into
//! integers and booleans. Use with `#[serde(deserialize_with = "text::deserialize")]`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

/// Accept a string, integer, float or bool and keep its text form.
///
/// # Errors
///
/// Fails for arrays, maps and missing values.
pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(d)? {
        Scalar::Text(text) => text,
        Scalar::Unsigned(value) => value.to_string(),
        Scalar::Signed(value) => value.to_string(),
        Scalar::Float(value) => value.to_string(),
        Scalar::Bool(value) => value.to_string(),
    })
}
