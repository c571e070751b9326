//! # **ColumnStore Module** - *Sealed Columnar Container*
//!
//! The immutable aggregate: a fixed row count, an ordered list of sealed
//! columns, and an identifier lookup. Its row-id set is the contiguous
//! range `[0, size)`.
//!
//! ## Behaviour
//! - Construction validates identifier uniqueness and that no column
//!   references a row outside `[0, size)`; a store never half-exists.
//! - Columns are `Arc`-shared, so stores and every view derived from
//!   them are cheap to clone and safe to share across threads read-only.
//! - Filter evaluation picks its strategy per storage shape: indexed
//!   columns answer with one map lookup and a set intersection, dense
//!   columns scan only the currently selected rows.

#[cfg(feature = "fast_hash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::enums::column::Column;
use crate::enums::error::MinfacetError;
use crate::enums::set::{IntSet, IntSetBuilder, SetIter};
use crate::enums::value::Value;
use crate::structs::filter::ValueFilter;
use crate::structs::sets::range::{RangeIter, RangeSet};
use crate::structs::view::FilteredView;
use crate::traits::filterable::Filterable;
use crate::traits::reducer::Reducer;

/// # ColumnStore
///
/// Immutable columnar store over rows `[0, size)`.
///
/// ## Example
/// ```rust
/// use minfacet::{Filterable, read_csv, IngestParams};
///
/// let store = read_csv("color,size\nred,1\nblue,2\nred,3\n", IngestParams::default()).unwrap();
/// assert_eq!(store.size(), 3);
/// assert_eq!(store.filter_by_value("color", "red").size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnStore {
    size: usize,
    row_set: IntSet,
    cols: Vec<Arc<Column>>,
    index: HashMap<String, usize>,
}

impl ColumnStore {
    /// Seals `cols` into a store over `size` rows.
    pub fn new(size: usize, cols: Vec<Column>) -> Result<Self, MinfacetError> {
        let mut index = HashMap::default();
        for (i, col) in cols.iter().enumerate() {
            if index.insert(col.identifier().to_string(), i).is_some() {
                return Err(MinfacetError::DuplicateField {
                    identifier: col.identifier().to_string(),
                });
            }
            let out_of_range = match col {
                Column::Indexed(f) => f
                    .entries()
                    .filter_map(|(_, set)| set.max())
                    .find(|&row| row >= size),
                Column::Dense(f) => {
                    let end = f.first_row() + f.data_array().len();
                    (end > size).then(|| end - 1)
                }
            };
            if let Some(row) = out_of_range {
                return Err(MinfacetError::RowRange {
                    identifier: col.identifier().to_string(),
                    row,
                    size,
                });
            }
        }
        Ok(Self {
            size,
            row_set: IntSet::Range(RangeSet::new(0, size)),
            cols: cols.into_iter().map(Arc::new).collect(),
            index,
        })
    }

    /// Evaluates `filter` against the rows in `current`.
    ///
    /// Indexed columns intersect the value's precomputed set; dense
    /// columns scan `current` comparing cell values. A filter naming an
    /// unknown field matches no rows.
    pub(crate) fn eval_filter(&self, current: &IntSet, filter: &ValueFilter) -> IntSet {
        match self.field(&filter.field) {
            None => IntSet::Empty,
            Some(Column::Indexed(f)) => f.int_set_for_value(&filter.value).intersection(current),
            Some(Column::Dense(f)) => {
                let mut b = IntSetBuilder::new();
                current.each(|row| {
                    if f.row_has_value(row, &filter.value) {
                        b.push(row);
                    }
                });
                b.finish()
            }
        }
    }

    /// Splits `current` by the distinct values of a field, in value
    /// order (declared order for indexed columns, first-seen row order
    /// for dense ones). Values selecting no rows are omitted.
    pub(crate) fn partition_sets(
        &self,
        current: &IntSet,
        identifier: &str,
    ) -> Vec<(Value, IntSet)> {
        match self.field(identifier) {
            None => Vec::new(),
            Some(Column::Indexed(f)) => f
                .entries()
                .map(|(value, set)| (value.clone(), set.intersection(current)))
                .filter(|(_, set)| !set.is_empty())
                .collect(),
            Some(Column::Dense(f)) => {
                let mut order: Vec<Value> = Vec::new();
                let mut builders: HashMap<Value, IntSetBuilder> = HashMap::default();
                current.each(|row| {
                    if let Some(value) = f.value(row) {
                        let b = builders.entry(value.clone()).or_insert_with(|| {
                            order.push(value.clone());
                            IntSetBuilder::new()
                        });
                        b.push(row);
                    }
                });
                order
                    .into_iter()
                    .map(|value| {
                        let set = builders.remove(&value).unwrap().finish();
                        (value, set)
                    })
                    .collect()
            }
        }
    }

    /// Partition views sharing this store, with `base_filters` extended
    /// by each value's own equality filter.
    pub(crate) fn partition_views(
        &self,
        current: &IntSet,
        base_filters: &[ValueFilter],
        identifier: &str,
    ) -> Vec<(Value, FilteredView)> {
        self.partition_sets(current, identifier)
            .into_iter()
            .map(|(value, set)| {
                let mut filters = base_filters.to_vec();
                filters.push(ValueFilter::new(identifier, value.clone()));
                (value, FilteredView::assemble(self.clone(), filters, set))
            })
            .collect()
    }
}

impl Filterable for ColumnStore {
    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn int_set(&self) -> &IntSet {
        &self.row_set
    }

    /// A raw store carries no filters.
    #[inline]
    fn filters(&self) -> &[ValueFilter] {
        &[]
    }

    fn filter(&self, filter: ValueFilter) -> FilteredView {
        let bits = self.eval_filter(&self.row_set, &filter);
        FilteredView::assemble(self.clone(), vec![filter], bits)
    }

    #[inline]
    fn field(&self, identifier: &str) -> Option<&Column> {
        self.index.get(identifier).map(|&i| &*self.cols[i])
    }

    #[inline]
    fn fields(&self) -> &[Arc<Column>] {
        &self.cols
    }

    fn row_ids(&self) -> SetIter<'_> {
        SetIter::Range(RangeIter::new(0, self.size))
    }

    fn partition_ordered(&self, identifier: &str) -> Vec<(Value, FilteredView)> {
        self.partition_views(&self.row_set, &[], identifier)
    }
}

impl Display for ColumnStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ColumnStore [{} rows x {} fields]", self.size, self.cols.len())?;
        for col in &self.cols {
            write!(f, "\n  {}", col.descriptor())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::RowId;
    use crate::enums::value::ValueType;
    use crate::structs::dense::DenseFieldBuilder;
    use crate::structs::field::FieldDescriptor;
    use crate::structs::indexed::IndexedFieldBuilder;

    fn color_col(values: &[&str]) -> Column {
        let mut b = IndexedFieldBuilder::new(FieldDescriptor::new("color", ValueType::Str));
        for (row, v) in values.iter().enumerate() {
            b.insert(row, Value::from(*v));
        }
        Column::Indexed(b.finish())
    }

    fn note_col(values: &[(RowId, &str)]) -> Column {
        let mut b = DenseFieldBuilder::new(FieldDescriptor::new("note", ValueType::Str));
        for &(row, v) in values {
            b.push((row, Value::from(v)));
        }
        Column::Dense(b.finish())
    }

    fn store() -> ColumnStore {
        ColumnStore::new(
            3,
            vec![
                color_col(&["red", "blue", "red"]),
                note_col(&[(0, "a"), (1, "b"), (2, "a")]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_construction_and_lookup() {
        let s = store();
        assert_eq!(s.size(), 3);
        assert_eq!(s.int_set().len(), 3);
        assert!(s.field("color").is_some());
        assert!(s.field("missing").is_none());
        assert_eq!(s.fields().len(), 2);
        assert!(s.filters().is_empty());
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let err = ColumnStore::new(3, vec![color_col(&["x"]), color_col(&["y"])]);
        assert!(matches!(
            err,
            Err(MinfacetError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_row_range_validated() {
        let err = ColumnStore::new(2, vec![color_col(&["a", "b", "c"])]);
        assert!(matches!(err, Err(MinfacetError::RowRange { .. })));
    }

    #[test]
    fn test_indexed_filter_path() {
        let s = store();
        let view = s.filter_by_value("color", "red");
        assert_eq!(view.size(), 2);
        assert_eq!(view.int_set().iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_dense_filter_path() {
        let s = store();
        let view = s.filter_by_value("note", "a");
        assert_eq!(view.int_set().iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_unknown_field_filter_matches_nothing() {
        let s = store();
        assert_eq!(s.filter_by_value("nope", "x").size(), 0);
    }

    #[test]
    fn test_each_row_ascending() {
        let s = store();
        let mut rows = Vec::new();
        s.each_row(|row| rows.push(row));
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_partition() {
        let s = store();
        let parts = s.partition("color");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts["red"].size(), 2);
        assert_eq!(parts["blue"].size(), 1);
        assert_eq!(
            parts["red"].int_set().iter().collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn test_partition_on_dense_column() {
        let s = store();
        let parts = s.partition("note");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts["a"].int_set().iter().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(parts["b"].int_set().iter().collect::<Vec<_>>(), vec![1]);
    }
}
