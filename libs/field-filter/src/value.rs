//! Event data model.
//!
//! An [`Event`] is a flat record of field name to [`FieldValue`]. A field can
//! hold a JSON value (including JSON `null`) or be [`FieldValue::Absent`], the
//! marker a filter leaves behind when it clears a field without deleting its
//! key.

use indexmap::map::{self, IndexMap};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::FilterError;

/// Value stored under an event field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The field key exists but carries no value.
    Absent,
    /// Any JSON value, `null` included.
    Value(Value),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// True only for JSON `null`, never for [`FieldValue::Absent`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Value(Value::Null))
    }

    /// True only for the empty string. Empty arrays and objects are not empty
    /// strings and are left alone.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, FieldValue::Value(Value::String(s)) if s.is_empty())
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Value(value) => Some(value),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Value(value)
    }
}

impl From<Option<Value>> for FieldValue {
    fn from(value: Option<Value>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Value)
    }
}

/// Flat field map processed by an [`EventFilter`](crate::EventFilter).
///
/// Fields keep their insertion order, which is also the order key snapshots
/// and encoded payloads follow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    fields: IndexMap<String, FieldValue>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_map(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .map(|(name, value)| (name, FieldValue::Value(value)))
            .collect();
        Self { fields }
    }

    /// Decodes an event from a JSON object document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FilterError> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(map) => Ok(Self::from_json_map(map)),
            other => Err(FilterError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Snapshot of the current field names, in order.
    pub fn keys(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// JSON view of the event. Absent fields are not emitted.
    pub fn to_json_value(&self) -> Value {
        let map = self
            .fields
            .iter()
            .filter_map(|(name, value)| value.as_value().map(|v| (name.clone(), v.clone())))
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<(String, FieldValue)> for Event {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Event {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.fields.values().filter(|v| !v.is_absent()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (name, value) in &self.fields {
            if let FieldValue::Value(value) = value {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_json_map)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
