//! Conversion between entities and the generic JSON dialect.
//!
//! Serialization rules, shared by every entity through [`JsonRecord`]:
//!
//! 1. `None` scalars and empty child lists are omitted
//! 2. A child list becomes an object keyed by each child's natural key
//! 3. A tagged variant is merged flat into the entity (`"sample_gender": "male"`)
//! 4. An entity's full form wraps its body one level deeper under its key,
//!    so a parent can merge many children into one name-keyed object

use serde_json::{Map, Value};

use crate::core::types::{EntityKind, ModelError};
use crate::core::variants::TaggedVariant;

/// An entity of the project graph with a natural key and a JSON body
pub trait Entity: Sized {
    const KIND: EntityKind;

    /// Natural key: name, lane number or barcode sequence
    fn key(&self) -> &str;

    /// The unwrapped serialized form
    fn to_body(&self) -> Map<String, Value>;

    /// Rebuild the entity from its unwrapped serialized form
    ///
    /// # Errors
    ///
    /// Returns a `ModelError` if the body is not an object, lacks the
    /// identity field, holds an unrecognized tagged variant, or contains
    /// children sharing a key.
    fn from_json(json: &Value) -> Result<Self, ModelError>;

    /// The body wrapped under the entity's key: `{key: body}`
    fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert(self.key().to_string(), Value::Object(self.to_body()));
        json
    }
}

/// Builder for an entity body following the omission and flattening rules
#[derive(Debug, Default)]
pub struct JsonRecord {
    map: Map<String, Value>,
}

impl JsonRecord {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scalar(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.map
                .insert(key.to_string(), Value::String(value.to_string()));
        }
        self
    }

    #[must_use]
    pub fn children<E: Entity>(mut self, key: &str, children: &[E]) -> Self {
        if !children.is_empty() {
            let mut nested = Map::new();
            for child in children {
                nested.extend(child.to_json());
            }
            self.map.insert(key.to_string(), Value::Object(nested));
        }
        self
    }

    #[must_use]
    pub fn variant<V: TaggedVariant>(mut self, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.map.extend(value.to_json());
        }
        self
    }

    pub fn build(self) -> Map<String, Value> {
        self.map
    }
}

/// Typed field access on an entity body
#[derive(Debug, Clone, Copy)]
pub struct JsonReader<'a> {
    kind: EntityKind,
    map: &'a Map<String, Value>,
}

impl<'a> JsonReader<'a> {
    /// # Errors
    ///
    /// Returns `ModelError::InvalidJson` if `json` is not an object.
    pub fn new(kind: EntityKind, json: &'a Value) -> Result<Self, ModelError> {
        match json {
            Value::Object(map) => Ok(Self { kind, map }),
            other => Err(ModelError::InvalidJson {
                entity: kind,
                detail: format!("expected an object but found {}", value_type(other)),
            }),
        }
    }

    pub fn map(&self) -> &'a Map<String, Value> {
        self.map
    }

    /// # Errors
    ///
    /// Returns `ModelError::MissingField` if the field is absent or null.
    pub fn required(&self, field: &'static str) -> Result<String, ModelError> {
        self.optional(field)?.ok_or(ModelError::MissingField {
            entity: self.kind,
            field,
        })
    }

    /// Scalars are kept as text; numbers (e.g. a lane given as `1`) are stringified.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidJson` if the field holds an object, array or bool.
    pub fn optional(&self, field: &'static str) -> Result<Option<String>, ModelError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(ModelError::InvalidJson {
                entity: self.kind,
                detail: format!("field '{field}' is {}", value_type(other)),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns `ModelError::UnrecognizedVariant` for an unknown description.
    pub fn variant<V: TaggedVariant>(&self) -> Result<Option<V>, ModelError> {
        V::from_json(self.map)
    }

    /// Values of a name-keyed child collection; an absent key means no children.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidJson` if the field is not an object.
    pub fn children(&self, field: &'static str) -> Result<Vec<&'a Value>, ModelError> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Object(children)) => Ok(children.values().collect()),
            Some(other) => Err(ModelError::InvalidJson {
                entity: self.kind,
                detail: format!("field '{field}' should be an object but is {}", value_type(other)),
            }),
        }
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Append `child` unless a sibling already uses its key
pub(crate) fn push_unique<E: Entity>(
    parent_kind: EntityKind,
    parent_key: &str,
    children: &mut Vec<E>,
    child: E,
) -> Result<(), ModelError> {
    if children.iter().any(|existing| existing.key() == child.key()) {
        return Err(ModelError::duplicate(parent_kind, parent_key, child.key()));
    }
    children.push(child);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::Barcode;
    use crate::core::variants::Gender;
    use serde_json::json;

    #[test]
    fn test_record_omits_empty_values() {
        let body = JsonRecord::new()
            .scalar("present", Some("value"))
            .scalar("absent", None)
            .children::<Barcode>("no_children", &[])
            .variant::<Gender>(None)
            .build();
        assert_eq!(Value::Object(body), json!({"present": "value"}));
    }

    #[test]
    fn test_record_flattens_variants_and_keys_children() {
        let barcodes = vec![Barcode::new("ACGT"), Barcode::new("TTAA")];
        let body = JsonRecord::new()
            .variant(Some(Gender::Female))
            .children("lane_barcodes", &barcodes)
            .build();
        assert_eq!(
            Value::Object(body),
            json!({
                "sample_gender": "female",
                "lane_barcodes": {
                    "ACGT": {"barcode_sequence": "ACGT"},
                    "TTAA": {"barcode_sequence": "TTAA"}
                }
            })
        );
    }

    #[test]
    fn test_reader_fields() {
        let value = json!({"name": "x", "lane": 3, "flag": true, "kids": {"a": {}}});
        let reader = JsonReader::new(EntityKind::Lane, &value).unwrap();
        assert_eq!(reader.required("name").unwrap(), "x");
        assert_eq!(reader.optional("lane").unwrap().as_deref(), Some("3"));
        assert!(reader.optional("flag").is_err());
        assert_eq!(reader.optional("missing").unwrap(), None);
        assert!(matches!(
            reader.required("missing"),
            Err(ModelError::MissingField { field: "missing", .. })
        ));
        assert_eq!(reader.children("kids").unwrap().len(), 1);
        assert!(reader.children("missing").unwrap().is_empty());
        assert!(reader.children("name").is_err());
    }

    #[test]
    fn test_reader_rejects_non_objects() {
        let err = JsonReader::new(EntityKind::Project, &json!(["a"])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
