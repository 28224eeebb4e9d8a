//! Serde helpers for backend fields whose JSON type is not stable.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

/// Accepts `12`, `"12"`, `"a1b2..."` or `null` as a record id.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.and_then(|id| match id {
        RawId::Int(i) => Some(i.to_string()),
        RawId::Text(s) if s.trim().is_empty() => None,
        RawId::Text(s) => Some(s),
    }))
}

/// Same as [`opt_id`] but the field must be present and non-null.
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_id(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing record id"))
}
