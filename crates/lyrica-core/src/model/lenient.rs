//! Field deserializers for backend records whose types are not reliable.
//!
//! A field of the wrong JSON type is read as absent instead of failing
//! the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field as `T`, or `None` when it has any other shape.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a scalar field as text. See [`scalar_text`].
pub fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// The textual form of a JSON scalar.
///
/// Integral floats print without a fraction, so `1.0` reads as `1`.
/// `null`, arrays and objects have no textual form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Record {
        #[serde(deserialize_with = "optional")]
        count: Option<u64>,
        #[serde(deserialize_with = "scalar")]
        label: Option<String>,
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("a")).as_deref(), Some("a"));
        assert_eq!(scalar_text(&json!(5)).as_deref(), Some("5"));
        assert_eq!(scalar_text(&json!(-3)).as_deref(), Some("-3"));
        assert_eq!(scalar_text(&json!(1.0)).as_deref(), Some("1"));
        assert_eq!(scalar_text(&json!(0.25)).as_deref(), Some("0.25"));
        assert_eq!(scalar_text(&json!(false)).as_deref(), Some("false"));
        assert_eq!(scalar_text(&Value::Null), None);
        assert_eq!(scalar_text(&json!([1])), None);
        assert_eq!(scalar_text(&json!({"a": 1})), None);
    }

    #[test]
    fn test_wrong_types_read_as_absent() {
        let record: Record =
            serde_json::from_value(json!({"count": "many", "label": {"x": 1}})).unwrap();
        assert_eq!(record.count, None);
        assert_eq!(record.label, None);
    }

    #[test]
    fn test_missing_fields_default() {
        let record: Record = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record.count, None);
        assert_eq!(record.label, None);
    }

    #[test]
    fn test_scalars_are_read() {
        let record: Record =
            serde_json::from_value(json!({"count": 3, "label": 2.0})).unwrap();
        assert_eq!(record.count, Some(3));
        assert_eq!(record.label.as_deref(), Some("2"));
    }
}
