//! # **Persistence Writer** - *Store → JSON*
//!
//! Lossless projection of a sealed store onto the wire DTOs. Indexed
//! values serialize in declared order - empty sets included, so
//! declared-but-unobserved enumeration levels survive the trip.

use crate::enums::column::Column;
use crate::enums::error::MinfacetError;
use crate::enums::set::IntSet;
use crate::persist::meta::{
    FieldMetaData, IntSetMetaData, MAX_SAFE_ESTIMATE, RangeData, StoreData, ValueSetData,
};
use crate::structs::dense::DenseField;
use crate::structs::field::DistinctEstimate;
use crate::structs::indexed::IndexedField;
use crate::structs::store::ColumnStore;
use crate::traits::filterable::Filterable;

/// Projects a store onto its serialized shape.
pub fn write_store(store: &ColumnStore) -> StoreData {
    StoreData {
        size: store.size(),
        fields: store.fields().iter().map(|col| field_meta(col)).collect(),
    }
}

/// Serializes a store to a JSON string.
pub fn to_json(store: &ColumnStore) -> Result<String, MinfacetError> {
    Ok(serde_json::to_string(&write_store(store))?)
}

fn field_meta(col: &Column) -> FieldMetaData {
    let fd = col.descriptor();
    let mut meta = FieldMetaData {
        kind: String::new(),
        identifier: fd.identifier.clone(),
        display_name: fd.display_name.clone(),
        type_of_value: fd.value_type.as_str().to_string(),
        distinct_value_estimate: match col.distinct_estimate() {
            DistinctEstimate::Exact(n) => n as u64,
            DistinctEstimate::Unlimited => MAX_SAFE_ESTIMATE,
        },
        range: fd.range.map(|r| RangeData {
            min: r.min,
            max: r.max,
            integer_only: r.integer_only,
        }),
        type_constructor_name: fd.type_constructor.clone(),
        multiple_values_per_row: fd.multi_valued.then_some(true),
        values: None,
        offset: None,
        data_array: None,
    };
    match col {
        Column::Indexed(field) => {
            meta.kind = "indexed".to_string();
            meta.values = Some(indexed_values(field));
        }
        Column::Dense(field) => {
            meta.kind = "unindexed".to_string();
            meta.offset = Some(field.first_row());
            meta.data_array = Some(dense_cells(field));
        }
    }
    meta
}

fn indexed_values(field: &IndexedField) -> Vec<ValueSetData> {
    field
        .entries()
        .map(|(value, set)| ValueSetData {
            value: value.to_string(),
            data: set_meta(set),
        })
        .collect()
}

fn dense_cells(field: &DenseField) -> Vec<serde_json::Value> {
    field.data_array().iter().map(|v| v.to_json()).collect()
}

/// Serialized payload for one set. Bitmaps write under the `"array"`
/// tag; readers re-select the representation.
pub(crate) fn set_meta(set: &IntSet) -> IntSetMetaData {
    match set {
        _ if set.is_empty() => IntSetMetaData {
            tag: "empty".to_string(),
            min: None,
            max: None,
            data: None,
        },
        IntSet::Range(r) => IntSetMetaData {
            tag: "range".to_string(),
            min: Some(r.start),
            max: Some(r.end() - 1),
            data: None,
        },
        _ => IntSetMetaData {
            tag: "array".to_string(),
            min: None,
            max: None,
            data: Some(set.iter().collect()),
        },
    }
}
