//! Returned rows and their field visibility.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// One row returned by a query.
///
/// Fields named in `hidden` are left out when the record is serialized,
/// unless [`Record::reveal_hidden`] has been called. Revealing changes
/// visibility only; the stored values are never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
    hidden: Vec<String>,
    revealed: bool,
}

impl Record {
    /// Wrap a raw row, concealing the given fields.
    pub fn new(fields: Map<String, Value>, hidden: &[String]) -> Self {
        Self {
            fields,
            hidden: hidden.to_vec(),
            revealed: false,
        }
    }

    /// Make the hidden fields part of the serialized form.
    pub fn reveal_hidden(&mut self) {
        self.revealed = true;
    }

    /// Whether hidden fields have been revealed.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether a field is currently serialized.
    pub fn is_visible(&self, field: &str) -> bool {
        self.revealed || !self.hidden.iter().any(|h| h == field)
    }

    /// Raw value of a field, visible or not.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The fields that serialize, in row order.
    pub fn visible_fields(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(k, _)| self.is_visible(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Serialized form as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.visible_fields())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visible: Vec<(&String, &Value)> = self
            .fields
            .iter()
            .filter(|(k, _)| self.is_visible(k))
            .collect();
        let mut map = serializer.serialize_map(Some(visible.len()))?;
        for (key, value) in visible {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
