//! # **DenseField Module** - *Unindexed Per-Row Value Array*
//!
//! A column stored as a dense array indexed by row id, for
//! wide-cardinality columns where a value index would waste memory
//! (think free-text or unique identifiers). Always unary: at most one
//! value per row. `Value::Null` marks absence, and the `offset` trims
//! leading nulls so a column that only starts late pays nothing for the
//! empty prefix.

#[cfg(feature = "fast_hash")]
use ahash::AHashSet as HashSet;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashSet;

use crate::aliases::RowId;
use crate::enums::value::Value;
use crate::structs::field::FieldDescriptor;
use crate::traits::reducer::Reducer;

/// # DenseField
///
/// Dense column: row `r` maps to `data[r - offset]`.
///
/// ## Example
/// ```rust
/// use minfacet::{DenseFieldBuilder, FieldDescriptor, Reducer, Value, ValueType};
///
/// let mut b = DenseFieldBuilder::new(FieldDescriptor::new("note", ValueType::Str));
/// b.push((2, Value::from("warm")));
/// b.push((4, Value::from("cold")));
/// let field = b.finish();
/// assert_eq!(field.first_row(), 2);
/// assert_eq!(field.value(2), Some(&Value::from("warm")));
/// assert_eq!(field.value(3), None);
/// assert!(field.row_has_value(4, &Value::from("cold")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseField {
    /// Column metadata.
    pub descriptor: FieldDescriptor,
    data: Vec<Value>,
    offset: RowId,
}

impl DenseField {
    /// Reassembles a column from its serialized parts.
    pub fn from_parts(descriptor: FieldDescriptor, offset: RowId, data: Vec<Value>) -> Self {
        Self {
            descriptor,
            data,
            offset,
        }
    }

    /// The single value at `row`, or `None` when absent.
    #[inline]
    pub fn value(&self, row: RowId) -> Option<&Value> {
        if row < self.offset {
            return None;
        }
        match self.data.get(row - self.offset) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Zero- or one-element value list for `row`.
    pub fn values(&self, row: RowId) -> Vec<Value> {
        self.value(row).cloned().into_iter().collect()
    }

    /// Equality compare against the stored value.
    #[inline]
    pub fn row_has_value(&self, row: RowId, value: &Value) -> bool {
        self.value(row) == Some(value)
    }

    /// The row id of the first stored position. For serialization.
    #[inline]
    pub fn first_row(&self) -> RowId {
        self.offset
    }

    /// The raw backing array. For serialization.
    #[inline]
    pub fn data_array(&self) -> &[Value] {
        &self.data
    }
}

/// One-pass builder: feed `(row, value)` pairs with ascending rows.
/// Values listed in `null_values` coerce to `Value::Null` on the way
/// in; rows skipped entirely read back as null.
#[derive(Debug)]
pub struct DenseFieldBuilder {
    descriptor: FieldDescriptor,
    data: Vec<Value>,
    offset: Option<RowId>,
    null_values: HashSet<Value>,
    last: Option<RowId>,
}

impl DenseFieldBuilder {
    /// Builder with no null coercion.
    pub fn new(descriptor: FieldDescriptor) -> Self {
        Self {
            descriptor,
            data: Vec::new(),
            offset: None,
            null_values: HashSet::default(),
            last: None,
        }
    }

    /// Builder that coerces every value in `null_values` to null.
    pub fn with_null_values(descriptor: FieldDescriptor, null_values: Vec<Value>) -> Self {
        let mut b = Self::new(descriptor);
        b.null_values = null_values.into_iter().collect();
        b
    }
}

impl Reducer for DenseFieldBuilder {
    type Item = (RowId, Value);
    type Output = DenseField;

    fn push(&mut self, (row, value): (RowId, Value)) {
        if let Some(last) = self.last {
            assert!(
                row > last,
                "DenseFieldBuilder: rows must arrive strictly ascending ({} after {})",
                row,
                last
            );
        }
        self.last = Some(row);
        let value = if self.null_values.contains(&value) {
            Value::Null
        } else {
            value
        };
        let offset = match self.offset {
            Some(offset) => offset,
            None => {
                // leading nulls are trimmed by deferring the offset to
                // the first real value
                if value.is_null() {
                    return;
                }
                self.offset = Some(row);
                row
            }
        };
        let slot = row - offset;
        while self.data.len() < slot {
            self.data.push(Value::Null);
        }
        self.data.push(value);
    }

    fn finish(self) -> DenseField {
        DenseField {
            descriptor: self.descriptor,
            data: self.data,
            offset: self.offset.unwrap_or(0),
        }
    }
}
