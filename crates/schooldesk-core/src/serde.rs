use serde::{Deserialize, Deserializer};

/// Deserializes a value that the backend may send as `null`, falling back to
/// `T::default()`.
///
/// The permissions endpoint returns `"sidebar": null` for accounts without any
/// navigable module; the client treats that the same as an empty list.
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt: Option<T> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
