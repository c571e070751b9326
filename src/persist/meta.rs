//! # **Persistence Metadata** - *JSON-Shaped Wire DTOs*
//!
//! The language-neutral serialized shape of a sealed store, plus the
//! `"type/subtype;hint"` tag grammar reserved for future set encodings.
//! Wire names are camelCase; everything round-trips through
//! `serde_json`.
//!
//! Set payloads carry one of three tags today - `"empty"`, `"range"`,
//! `"array"` - and bitmap sets serialize under `"array"`: the reader
//! re-selects the in-memory representation, so the round-trip invariant
//! is behavioural rather than representational.

use serde::{Deserialize, Serialize};

use crate::aliases::RowId;

/// The largest JSON-safe integer; written in place of an unlimited
/// distinct-value estimate, since the wire format has no infinity.
pub const MAX_SAFE_ESTIMATE: u64 = 9_007_199_254_740_991;

/// Serialized store: row count plus per-field metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    pub size: usize,
    pub fields: Vec<FieldMetaData>,
}

/// Serialized field: the common descriptor plus whichever storage-shape
/// payload applies (`values` for indexed, `offset`/`dataArray` for
/// unindexed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetaData {
    /// `"indexed"` or `"unindexed"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
    pub display_name: String,
    pub type_of_value: String,
    pub distinct_value_estimate: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_constructor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_values_per_row: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ValueSetData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<RowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_array: Option<Vec<serde_json::Value>>,
}

/// Serialized numeric range, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeData {
    pub min: f64,
    pub max: f64,
    pub integer_only: bool,
}

/// One indexed value with its row set, in declared value order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSetData {
    /// The value's canonical string form.
    pub value: String,
    pub data: IntSetMetaData,
}

/// Serialized set payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntSetMetaData {
    /// `"empty"`, `"range"`, `"array"`, or a reserved
    /// `"type/subtype;hint"` grammar string.
    #[serde(rename = "type")]
    pub tag: String,
    /// Inclusive lower bound (`"range"` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<RowId>,
    /// Inclusive upper bound (`"range"` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<RowId>,
    /// Ascending ids (`"array"` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<RowId>>,
}

/// Parsed form of the reserved `"main/sub1/sub2;hint1;hint2"` set-tag
/// grammar: a main type, `/`-separated subtypes, `;`-separated hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTag {
    pub main_type: String,
    pub sub_types: Vec<String>,
    pub hints: Vec<String>,
}

impl TypeTag {
    /// Splits a tag string into its grammar parts. A bare tag like
    /// `"array"` parses to a main type with no subtypes or hints.
    pub fn parse(tag: &str) -> TypeTag {
        let mut sections = tag.split(';');
        let path = sections.next().unwrap_or("");
        let hints = sections.map(str::to_string).collect();
        let mut path_parts = path.split('/');
        let main_type = path_parts.next().unwrap_or("").to_string();
        let sub_types = path_parts.map(str::to_string).collect();
        TypeTag {
            main_type,
            sub_types,
            hints,
        }
    }

    /// Descends into the first subtype, keeping the hints; `None` when
    /// there is nothing further to descend into.
    pub fn next(&self) -> Option<TypeTag> {
        let (first, rest) = self.sub_types.split_first()?;
        Some(TypeTag {
            main_type: first.clone(),
            sub_types: rest.to_vec(),
            hints: self.hints.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_tag() {
        let tag = TypeTag::parse("array");
        assert_eq!(tag.main_type, "array");
        assert!(tag.sub_types.is_empty());
        assert!(tag.hints.is_empty());
        assert_eq!(tag.next(), None);
    }

    #[test]
    fn test_grammar_tag() {
        let tag = TypeTag::parse("bitmap/words/v1;w32;offset");
        assert_eq!(tag.main_type, "bitmap");
        assert_eq!(tag.sub_types, vec!["words", "v1"]);
        assert_eq!(tag.hints, vec!["w32", "offset"]);

        let inner = tag.next().unwrap();
        assert_eq!(inner.main_type, "words");
        assert_eq!(inner.sub_types, vec!["v1"]);
        assert_eq!(inner.hints, vec!["w32", "offset"]);
        assert_eq!(inner.next().unwrap().main_type, "v1");
    }

    #[test]
    fn test_set_meta_wire_names() {
        let meta = IntSetMetaData {
            tag: "range".to_string(),
            min: Some(0),
            max: Some(4),
            data: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["type"], "range");
        assert_eq!(json["min"], 0);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_field_meta_wire_names() {
        let field = FieldMetaData {
            kind: "unindexed".to_string(),
            identifier: "note".to_string(),
            display_name: "Note".to_string(),
            type_of_value: "string".to_string(),
            distinct_value_estimate: MAX_SAFE_ESTIMATE,
            range: None,
            type_constructor_name: None,
            multiple_values_per_row: None,
            values: None,
            offset: Some(0),
            data_array: Some(vec![serde_json::json!("x")]),
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "unindexed");
        assert_eq!(json["displayName"], "Note");
        assert_eq!(json["typeOfValue"], "string");
        assert_eq!(json["dataArray"][0], "x");
    }
}
