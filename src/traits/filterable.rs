//! # **Filterable Trait** - *Shared Query Surface*
//!
//! The query operations a raw `ColumnStore` and a `FilteredView`
//! have in common, so call sites can narrow either without caring which
//! they hold. Filtering always yields a `FilteredView`; a store is just
//! the zero-filter starting point.
//!
//! The three filter entry points construct the same `ValueFilter`:
//! `filter` takes one ready-made, `filter_by_value` names the field by
//! identifier, and `filter_by_field` takes the descriptor and labels the
//! filter with the field's display name.

#[cfg(feature = "fast_hash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

use std::sync::Arc;

use crate::aliases::RowId;
use crate::enums::column::Column;
use crate::enums::set::{IntSet, SetIter};
use crate::enums::value::Value;
use crate::structs::field::FieldDescriptor;
use crate::structs::filter::ValueFilter;
use crate::structs::view::FilteredView;

/// Query surface shared by [`ColumnStore`](crate::structs::store::ColumnStore)
/// and [`FilteredView`].
pub trait Filterable {
    /// Number of selected rows.
    fn size(&self) -> usize;

    /// The selected row-id set: the full range for a raw store, the
    /// precomputed filter intersection for a view.
    fn int_set(&self) -> &IntSet;

    /// Applied filters, in application order. Empty for a raw store.
    fn filters(&self) -> &[ValueFilter];

    /// Narrows by `filter`. Re-applying a filter already present is a
    /// no-op.
    fn filter(&self, filter: ValueFilter) -> FilteredView;

    /// The column with this identifier, if any.
    fn field(&self, identifier: &str) -> Option<&Column>;

    /// Every column, in declaration order.
    fn fields(&self) -> &[Arc<Column>];

    /// Ascending pull iterator over the selected rows.
    fn row_ids(&self) -> SetIter<'_>;

    /// One `(value, view)` pair per distinct value of the field that
    /// selects at least one row, in the field's value order.
    fn partition_ordered(&self, identifier: &str) -> Vec<(Value, FilteredView)>;

    /// Narrows by `identifier == value`.
    fn filter_by_value(&self, identifier: &str, value: impl Into<Value>) -> FilteredView {
        self.filter(ValueFilter::new(identifier, value))
    }

    /// Narrows by `field == value`, labelling the filter with the
    /// field's display name.
    fn filter_by_field(&self, field: &FieldDescriptor, value: impl Into<Value>) -> FilteredView {
        let value = value.into();
        let label = format!("{}: {}", field.display_name, value);
        self.filter(ValueFilter::new(field.identifier.clone(), value).with_display_name(label))
    }

    /// Invokes `action` for every selected row in ascending order.
    fn each_row<F: FnMut(RowId)>(&self, mut action: F) {
        for row in self.row_ids() {
            action(row);
        }
    }

    /// Partitions the selected rows by a field's distinct values, keyed
    /// by the value's string form. Values selecting no rows are omitted;
    /// key order is unspecified - use [`Filterable::partition_ordered`]
    /// when order matters.
    fn partition(&self, identifier: &str) -> HashMap<String, FilteredView> {
        self.partition_ordered(identifier)
            .into_iter()
            .map(|(value, view)| (value.to_string(), view))
            .collect()
    }
}
