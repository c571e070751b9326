//! # **Column Module** - *Unified Column Container*
//!
//! `Column` dispatches over the two storage shapes a sealed store can
//! hold: the value-indexed [`IndexedField`] and the dense per-row
//! [`DenseField`]. Filtering and partitioning code matches on the
//! variant to pick its evaluation strategy; everything else goes through
//! the delegating accessors here.

use crate::aliases::RowId;
use crate::enums::value::Value;
use crate::structs::dense::DenseField;
use crate::structs::field::{DistinctEstimate, FieldDescriptor};
use crate::structs::indexed::IndexedField;

/// # Column
///
/// A sealed column under either storage shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Value → row-set index.
    Indexed(IndexedField),
    /// Dense per-row array.
    Dense(DenseField),
}

impl Column {
    /// Column metadata.
    #[inline]
    pub fn descriptor(&self) -> &FieldDescriptor {
        match self {
            Column::Indexed(f) => &f.descriptor,
            Column::Dense(f) => &f.descriptor,
        }
    }

    /// The column's identifier.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.descriptor().identifier
    }

    /// Every value `row` carries for this column.
    pub fn values(&self, row: RowId) -> Vec<Value> {
        match self {
            Column::Indexed(f) => f.values(row),
            Column::Dense(f) => f.values(row),
        }
    }

    /// True when `row` carries `value`.
    #[inline]
    pub fn row_has_value(&self, row: RowId, value: &Value) -> bool {
        match self {
            Column::Indexed(f) => f.row_has_value(row, value),
            Column::Dense(f) => f.row_has_value(row, value),
        }
    }

    /// Distinct-value estimate: exact for indexed columns, whatever the
    /// descriptor knows (unlimited by default) for dense ones.
    pub fn distinct_estimate(&self) -> DistinctEstimate {
        match self {
            Column::Indexed(f) => f.distinct_estimate(),
            Column::Dense(f) => f
                .descriptor
                .distinct_estimate
                .unwrap_or(DistinctEstimate::Unlimited),
        }
    }

    /// The indexed shape, if that is what this column is.
    #[inline]
    pub fn as_indexed(&self) -> Option<&IndexedField> {
        match self {
            Column::Indexed(f) => Some(f),
            Column::Dense(_) => None,
        }
    }

    /// The dense shape, if that is what this column is.
    #[inline]
    pub fn as_dense(&self) -> Option<&DenseField> {
        match self {
            Column::Indexed(_) => None,
            Column::Dense(f) => Some(f),
        }
    }
}

impl From<IndexedField> for Column {
    fn from(f: IndexedField) -> Self {
        Column::Indexed(f)
    }
}

impl From<DenseField> for Column {
    fn from(f: DenseField) -> Self {
        Column::Dense(f)
    }
}
