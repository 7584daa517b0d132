use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes a field that upstream APIs fill inconsistently. A value of the
/// wrong shape (including `null`) falls back to `T::default()` instead of
/// failing the whole response.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;

    Ok(T::deserialize(value).unwrap_or_default())
}
