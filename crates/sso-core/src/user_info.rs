//! Provider-supplied user attribute bag.
//!
//! Identity providers hand over user attributes as a flat map whose keys
//! encode nesting with dotted numeric indexes (`organizations.0`,
//! `custom_data.identification`). Some hosts deliver the nested form instead;
//! both are accepted and stored flat, in delivery order.

use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Flat, ordered `key -> string | null` attribute map.
///
/// Values are `Value::String` or `Value::Null`; the map keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderUserInfo {
    entries: Map<String, Value>,
}

impl ProviderUserInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a JSON value, flattening nested objects and arrays.
    ///
    /// `{"organizations": ["a"], "custom_data": {"identification": "1"}}`
    /// becomes `organizations.0 = "a"` and `custom_data.identification = "1"`.
    /// Keys that are already dotted are kept as they are. Numbers and
    /// booleans keep their JSON text. A non-object root yields an empty bag.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut info = Self::new();
        if let Value::Object(map) = value {
            for (key, value) in map {
                info.flatten_into(key.clone(), value);
            }
        }
        info
    }

    fn flatten_into(&mut self, key: String, value: &Value) {
        match value {
            Value::Object(map) => {
                for (child, value) in map {
                    self.flatten_into(format!("{key}.{child}"), value);
                }
            }
            Value::Array(items) => {
                for (index, value) in items.iter().enumerate() {
                    self.flatten_into(format!("{key}.{index}"), value);
                }
            }
            Value::Null => self.insert(key, None),
            Value::String(text) => self.insert(key, Some(text.clone())),
            Value::Bool(flag) => self.insert(key, Some(flag.to_string())),
            Value::Number(number) => self.insert(key, Some(number.to_string())),
        }
    }

    /// Insert or replace a value. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries
            .insert(key.into(), value.map_or(Value::Null, Value::String));
    }

    /// Value for `key`; `None` when the key is absent or null.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Entries whose key starts with `prefix`, yielding the remainder of the
    /// key and the value, in bag order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        self.iter()
            .filter_map(move |(key, value)| key.strip_prefix(prefix).map(|rest| (rest, value)))
    }
}

impl<K, V> FromIterator<(K, V)> for ProviderUserInfo
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut info = Self::new();
        for (key, value) in iter {
            info.insert(key, Some(value.into()));
        }
        info
    }
}

impl Serialize for ProviderUserInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProviderUserInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Object(_) => Ok(Self::from_value(&value)),
            other => Err(serde::de::Error::custom(format!(
                "user info must be an object, got {other}"
            ))),
        }
    }
}

impl JsonSchema for ProviderUserInfo {
    fn schema_name() -> Cow<'static, str> {
        "ProviderUserInfo".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "description": "Provider attributes, flat (`organizations.0`) or nested.",
            "additionalProperties": true
        })
    }
}
