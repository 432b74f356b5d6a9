//! JSON helpers for query values, documents and special field shapes.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::CoreError;

/// Encode a key (or list of keys) the way CouchDB expects view parameters:
/// as JSON text. The string `abc` becomes `"abc"`.
///
/// The result still needs percent-encoding before it goes into a URL.
pub fn encode_query_value<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    Ok(serde_json::to_string(value)?)
}

pub fn encode_document<T: Serialize + ?Sized>(document: &T) -> Result<String, CoreError> {
    Ok(serde_json::to_string(document)?)
}

pub fn decode_document<T: DeserializeOwned>(json: &str) -> Result<T, CoreError> {
    Ok(serde_json::from_str(json)?)
}

pub fn decode_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Current UTC time as RFC 3339 with millisecond precision.
#[must_use]
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Revision nested in a row value: `{"rev": "1-abc"}` ↔ `Some("1-abc")`.
///
/// Other fields of the object are ignored.
pub mod nested_revision {
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::{Map, Value};

    pub fn serialize<S: Serializer>(rev: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        match rev {
            Some(rev) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("rev", rev)?;
                map.end()
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(value.and_then(|map| match map.get("rev") {
            None | Some(Value::Null) => None,
            Some(Value::String(rev)) => Some(rev.clone()),
            Some(other) => Some(other.to_string()),
        }))
    }
}

/// ISO-8601 calendar dates (`2024-03-01`), `null` ↔ `None`.
pub mod local_date {
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| NaiveDate::parse_from_str(&s, FORMAT).map_err(D::Error::custom))
            .transpose()
    }
}
