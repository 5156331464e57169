//! # Records
//!
//! A [`Record`] is one item of a remote collection. The sync layer knows exactly one
//! thing about it: its [`RecordId`]. Every other field is carried through untouched in
//! a JSON map so the same store, coordinator and projection serve enterprises, classes,
//! promo codes or anything else the console lists.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::{self, Display};

/// Type-safe identifier for records.
///
/// Backends mix numeric and string ids; both are normalised to their string form so
/// that `7` and `"7"` name the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads an id out of a JSON value. Only strings and integers qualify.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Opaque pass-through payload used for create and update requests.
pub type Payload = Map<String, Value>;

/// One item in a resource collection.
///
/// Wire ids may be spelled `id` or `_id`; the record always serialises back as `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, fields: Map<String, Value>) -> Self {
        let mut fields = fields;
        fields.remove("id");
        fields.remove("_id");
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Builds a record from a JSON object, pulling the id out of `id` or `_id`.
    pub fn from_object(mut fields: Map<String, Value>) -> Option<Self> {
        let id = fields
            .get("id")
            .and_then(RecordId::from_json)
            .or_else(|| fields.get("_id").and_then(RecordId::from_json))?;
        fields.remove("id");
        fields.remove("_id");
        Some(Self { id, fields })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Looks up a field by dot-separated path, e.g. `enterprise.name`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Sets a top-level field, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Renders the record back into a single JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::String(self.id.to_string()));
        Value::Object(object)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Record::from_object(fields).ok_or_else(|| de::Error::custom("record is missing an `id`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_are_the_same_record() {
        let a: Record = serde_json::from_value(json!({ "id": 7, "name": "A" })).unwrap();
        let b: Record = serde_json::from_value(json!({ "id": "7", "name": "B" })).unwrap();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn underscore_id_is_accepted_and_written_back_as_id() {
        let record: Record =
            serde_json::from_value(json!({ "_id": "c-1", "title": "Math" })).unwrap();
        assert_eq!(record.id().as_str(), "c-1");
        assert_eq!(record.to_json(), json!({ "id": "c-1", "title": "Math" }));
    }

    #[test]
    fn missing_id_is_rejected() {
        let result: Result<Record, _> = serde_json::from_value(json!({ "name": "orphan" }));
        assert!(result.is_err());
    }

    #[test]
    fn nested_lookup_follows_dots() {
        let record: Record =
            serde_json::from_value(json!({ "id": 1, "enterprise": { "name": "Acme" } })).unwrap();
        assert_eq!(record.get("enterprise.name"), Some(&json!("Acme")));
        assert_eq!(record.get("enterprise.missing"), None);
    }
}
