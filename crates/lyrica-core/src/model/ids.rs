use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque song identifier as reported by the backend.
///
/// The backend has sent both numeric and string ids, so the value is kept
/// in its textual form and never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an id from any JSON value. `null` yields an empty id.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::default(),
            Value::String(s) => Self(s.clone()),
            other => Self(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for SongId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_song_id_from_number() {
        assert_eq!(SongId::from_value(&json!(42)).as_str(), "42");
    }

    #[test]
    fn test_song_id_from_string() {
        assert_eq!(SongId::from_value(&json!("abc-1")).as_str(), "abc-1");
    }

    #[test]
    fn test_song_id_from_null() {
        assert!(SongId::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn test_song_id_deserialize() {
        let id: SongId = serde_json::from_str("7").unwrap();
        assert_eq!(id, SongId::new("7"));
        assert_eq!(id.to_string(), "7");
    }
}
