//! # **Persistence Reader** - *JSON → Store*
//!
//! Validated reconstruction of a sealed store from its wire shape.
//! Malformed metadata is rejected immediately with a descriptive error;
//! a store never half-exists. Set payloads re-select their in-memory
//! representation, so a set written from a bitmap may come back as a
//! range - membership is what round-trips.

use crate::enums::column::Column;
use crate::enums::error::MinfacetError;
use crate::enums::set::IntSet;
use crate::enums::value::{Value, ValueType};
use crate::persist::meta::{FieldMetaData, IntSetMetaData, StoreData, TypeTag};
use crate::structs::dense::DenseField;
use crate::structs::field::{DISTINCT_LIMIT, DistinctEstimate, FieldDescriptor, NumericRange};
use crate::structs::indexed::IndexedField;
use crate::structs::sets::range::RangeSet;
use crate::structs::store::ColumnStore;

/// Deserializes a store from a JSON string.
pub fn from_json(text: &str) -> Result<ColumnStore, MinfacetError> {
    let data: StoreData = serde_json::from_str(text)?;
    read_store(&data)
}

/// Reconstructs a store from its serialized shape.
pub fn read_store(data: &StoreData) -> Result<ColumnStore, MinfacetError> {
    let mut cols = Vec::with_capacity(data.fields.len());
    for field in &data.fields {
        cols.push(read_field(field)?);
    }
    ColumnStore::new(data.size, cols)
}

fn read_field(meta: &FieldMetaData) -> Result<Column, MinfacetError> {
    let value_type = ValueType::parse(&meta.type_of_value)?;
    let mut descriptor = FieldDescriptor::new(meta.identifier.clone(), value_type);
    descriptor.display_name = meta.display_name.clone();
    descriptor.range = meta.range.map(|r| NumericRange::new(r.min, r.max, r.integer_only));
    descriptor.distinct_estimate = Some(if meta.distinct_value_estimate <= DISTINCT_LIMIT as u64 {
        DistinctEstimate::Exact(meta.distinct_value_estimate as usize)
    } else {
        DistinctEstimate::Unlimited
    });
    descriptor.multi_valued = meta.multiple_values_per_row.unwrap_or(false);
    descriptor.type_constructor = meta.type_constructor_name.clone();

    match meta.kind.as_str() {
        "indexed" => {
            let values = meta.values.as_ref().ok_or_else(|| MinfacetError::Metadata {
                message: format!("indexed field '{}' carries no values", meta.identifier),
            })?;
            let mut entries = Vec::with_capacity(values.len());
            for vsd in values {
                let value = Value::parse_typed(&vsd.value, value_type)?;
                entries.push((value, read_set(&vsd.data)?));
            }
            Ok(Column::Indexed(IndexedField::from_entries(
                descriptor, entries,
            )?))
        }
        "unindexed" => {
            let offset = meta.offset.ok_or_else(|| MinfacetError::Metadata {
                message: format!("unindexed field '{}' carries no offset", meta.identifier),
            })?;
            let cells = meta
                .data_array
                .as_ref()
                .ok_or_else(|| MinfacetError::Metadata {
                    message: format!("unindexed field '{}' carries no dataArray", meta.identifier),
                })?
                .iter()
                .map(Value::from_json)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Column::Dense(DenseField::from_parts(
                descriptor, offset, cells,
            )))
        }
        other => Err(MinfacetError::Metadata {
            message: format!(
                "field '{}' has unknown storage type '{}'",
                meta.identifier, other
            ),
        }),
    }
}

/// Decodes one set payload. Unrecognised tags - including reserved
/// `"type/subtype;hint"` encodings - are rejected with the parsed main
/// type named.
pub(crate) fn read_set(meta: &IntSetMetaData) -> Result<IntSet, MinfacetError> {
    let tag = TypeTag::parse(&meta.tag);
    match tag.main_type.as_str() {
        "empty" => Ok(IntSet::Empty),
        "range" => match (meta.min, meta.max) {
            (Some(min), Some(max)) if min <= max => {
                Ok(IntSet::Range(RangeSet::from_bounds(min, max)))
            }
            _ => Err(MinfacetError::Metadata {
                message: "range set payload needs min <= max".to_string(),
            }),
        },
        "array" => {
            let data = meta.data.as_ref().ok_or_else(|| MinfacetError::Metadata {
                message: "array set payload carries no data".to_string(),
            })?;
            if !data.windows(2).all(|w| w[0] < w[1]) {
                return Err(MinfacetError::Metadata {
                    message: "array set payload must be strictly ascending".to_string(),
                });
            }
            Ok(IntSet::from_sorted(data.clone()))
        }
        other => Err(MinfacetError::Metadata {
            message: format!("unsupported set encoding '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(tag: &str) -> IntSetMetaData {
        IntSetMetaData {
            tag: tag.to_string(),
            min: None,
            max: None,
            data: None,
        }
    }

    #[test]
    fn test_read_set_variants() {
        assert_eq!(read_set(&meta("empty")).unwrap(), IntSet::Empty);

        let mut range = meta("range");
        range.min = Some(3);
        range.max = Some(6);
        let set = read_set(&range).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 4, 5, 6]);

        let mut array = meta("array");
        array.data = Some(vec![1, 5, 9]);
        let set = read_set(&array).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 5, 9]);
    }

    #[test]
    fn test_read_set_rejects_malformed() {
        let mut range = meta("range");
        range.min = Some(6);
        range.max = Some(3);
        assert!(read_set(&range).is_err());

        let mut array = meta("array");
        array.data = Some(vec![5, 5]);
        assert!(read_set(&array).is_err());

        assert!(read_set(&meta("array")).is_err());
    }

    #[test]
    fn test_reserved_grammar_rejected_by_main_type() {
        let err = read_set(&meta("bitmap/words;w32")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bitmap"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_malformed_store_is_fatal() {
        // unknown storage kind
        let json = r#"{"size":1,"fields":[{"type":"mystery","identifier":"x",
            "displayName":"x","typeOfValue":"string","distinctValueEstimate":1}]}"#;
        assert!(from_json(json).is_err());

        // indexed without values
        let json = r#"{"size":1,"fields":[{"type":"indexed","identifier":"x",
            "displayName":"x","typeOfValue":"string","distinctValueEstimate":1}]}"#;
        assert!(from_json(json).is_err());

        // bad typeOfValue
        let json = r#"{"size":1,"fields":[{"type":"indexed","identifier":"x",
            "displayName":"x","typeOfValue":"decimal","distinctValueEstimate":1,"values":[]}]}"#;
        assert!(from_json(json).is_err());
    }
}
