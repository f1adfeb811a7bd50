//! Tolerant deserializers for platform payloads.
//!
//! The data platform is loose about JSON types: numeric fields such as
//! `expires_in` and `links.count` arrive either as numbers or as strings,
//! and array fields are sometimes `null` instead of absent.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

/// Deserializes an optional `u64` from a JSON number, numeric string, or null.
///
/// Blank strings are treated as absent.
///
/// # Errors
///
/// Returns an error if a string value is not a valid unsigned integer.
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse().map(Some).map_err(de::Error::custom)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

/// Deserializes an optional string from a JSON string, number, bool, or null.
///
/// Non-string scalars are kept in their JSON text form, so `400` becomes `"400"`.
///
/// # Errors
///
/// Returns an error if the value is an array or an object.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// Deserializes a `Vec<T>`, mapping JSON `null` to an empty vector.
///
/// # Errors
///
/// Returns an error if the value is neither null nor a valid array of `T`.
pub fn vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "opt_u64")]
        value: Option<u64>,
        #[serde(default, deserialize_with = "vec_or_null")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "opt_string")]
        code: Option<String>,
    }

    #[test]
    fn test_number_and_string_forms() {
        let payload: Payload = serde_json::from_str(r#"{"value": 600}"#).unwrap();
        assert_eq!(payload.value, Some(600));

        let payload: Payload = serde_json::from_str(r#"{"value": " 600 "}"#).unwrap();
        assert_eq!(payload.value, Some(600));
    }

    #[test]
    fn test_absent_null_and_blank_are_none() {
        let payload: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.value, None);

        let payload: Payload = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(payload.value, None);

        let payload: Payload = serde_json::from_str(r#"{"value": ""}"#).unwrap();
        assert_eq!(payload.value, None);
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let result = serde_json::from_str::<Payload>(r#"{"value": "soon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_array_becomes_empty() {
        let payload: Payload = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(payload.items.is_empty());
    }

    #[test]
    fn test_scalar_forms_become_strings() {
        let payload: Payload = serde_json::from_str(r#"{"code": 400}"#).unwrap();
        assert_eq!(payload.code.as_deref(), Some("400"));

        let payload: Payload = serde_json::from_str(r#"{"code": -1}"#).unwrap();
        assert_eq!(payload.code.as_deref(), Some("-1"));

        let payload: Payload = serde_json::from_str(r#"{"code": "ERR_1"}"#).unwrap();
        assert_eq!(payload.code.as_deref(), Some("ERR_1"));

        let payload: Payload = serde_json::from_str(r#"{"code": null}"#).unwrap();
        assert_eq!(payload.code, None);

        assert!(serde_json::from_str::<Payload>(r#"{"code": {"nested": 1}}"#).is_err());
    }
}
