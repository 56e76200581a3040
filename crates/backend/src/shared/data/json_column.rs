//! Helpers for columns that hold JSON text or enum codes.

use std::str::FromStr;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a list or struct into a TEXT column
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string(value).context("Failed to serialize JSON column")
}

/// Read a TEXT column back; blank text means the type's default
pub fn from_json<T: DeserializeOwned + Default>(raw: &str, column: &str) -> anyhow::Result<T> {
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(raw).with_context(|| format!("Column '{}' holds invalid JSON", column))
}

/// Parse an enum stored by its code
pub fn parse_code<T>(raw: &str, column: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("Column '{}': {}", column, e))
}
