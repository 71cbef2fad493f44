use chrono::{DateTime, Utc};
use serde::de::Error;
use serde::ser::Serializer;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// Deserialize a capture timestamp from epoch milliseconds (the helper's wire
/// format) or an RFC3339 string.
pub fn deserialize_epoch_millis<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) => s
            .parse::<DateTime<Utc>>()
            .map_err(|e| Error::custom(format!("invalid RFC3339 timestamp: {}", e))),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

/// Serialize a capture timestamp back to epoch milliseconds.
pub fn serialize_epoch_millis<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(timestamp.timestamp_millis())
}

/// Deserialize a clipboard item id, validating it is a GUID.
///
/// Windows hands out GUIDs for history entries; PowerShell renders them either
/// plain (`xxxx-...`) or braced (`{xxxx-...}`), both of which parse here. The
/// braces are kept so the id stays byte-identical to the wire value.
pub fn deserialize_item_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;

    if s.is_empty() {
        return Err(Error::custom("item id cannot be empty"));
    }

    Uuid::parse_str(&s)
        .map_err(|e| Error::custom(format!("invalid GUID format for item id: {}", e)))?;

    Ok(s)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use crate::models::HistoryItem;

    #[test]
    fn test_item_timestamp_epoch_millis() {
        let json = r#"{
            "Id": "550e8400-e29b-41d4-a716-446655440000",
            "Text": "hello",
            "Time": 1762076480016
        }"#;

        let item: HistoryItem = serde_json::from_str(json).unwrap();
        let expected = DateTime::from_timestamp_millis(1762076480016).unwrap();
        assert_eq!(item.captured_at, expected);
    }

    #[test]
    fn test_item_timestamp_rfc3339() {
        let json = r#"{
            "Id": "550e8400-e29b-41d4-a716-446655440000",
            "Text": "hello",
            "Time": "2025-11-02T09:41:20.016Z"
        }"#;

        let item: HistoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.captured_at.timestamp_millis(), 1762076480016);
    }

    #[test]
    fn test_item_rejects_empty_id() {
        let json = r#"{"Id": "", "Text": "hello", "Time": 0}"#;
        let result = serde_json::from_str::<HistoryItem>(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_item_rejects_non_guid_id() {
        let json = r#"{"Id": "not-a-guid", "Text": "hello", "Time": 0}"#;
        let result = serde_json::from_str::<HistoryItem>(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("GUID"));
    }

    #[test]
    fn test_serialize_round_trips_epoch_millis() {
        let json = r#"{"Id":"550e8400-e29b-41d4-a716-446655440000","Text":"x","Time":1700000000000}"#;
        let item: HistoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&item).unwrap(), json);
    }
}
