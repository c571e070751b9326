//! # **FilteredView Module** - *Narrowed Window Over a Store*
//!
//! A `FilteredView` is a logical sub-store: it shares the base store's
//! columns and merely narrows the row-id set to the intersection of
//! every applied filter. Row ids inside a view are base-store ids, so
//! shared columns interpret them unchanged.
//!
//! ## Behaviour
//! - Applying a filter already present returns the view unchanged -
//!   filter application is idempotent.
//! - Removing a filter rebuilds from the base store by re-applying the
//!   remaining filters in order; intersections are not invertible, and
//!   the rebuild cost is fine at interactive scales.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::enums::column::Column;
use crate::enums::set::{IntSet, SetIter};
use crate::enums::value::Value;
use crate::structs::filter::ValueFilter;
use crate::structs::store::ColumnStore;
use crate::traits::filterable::Filterable;

/// # FilteredView
///
/// A base store plus applied filters and the precomputed intersection
/// of their matching row sets.
///
/// ## Example
/// ```rust
/// use minfacet::{Filterable, read_csv, IngestParams};
///
/// let store = read_csv("color,size\nred,1\nblue,2\nred,3\n", IngestParams::default()).unwrap();
/// let red = store.filter_by_value("color", "red");
/// assert_eq!(red.size(), 2);
/// // idempotent: the same filter twice changes nothing
/// assert_eq!(red.filter_by_value("color", "red").size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FilteredView {
    source: ColumnStore,
    filters: Vec<ValueFilter>,
    bits: IntSet,
}

impl FilteredView {
    pub(crate) fn assemble(source: ColumnStore, filters: Vec<ValueFilter>, bits: IntSet) -> Self {
        Self {
            source,
            filters,
            bits,
        }
    }

    /// A view selecting every row of `source`, with no filters applied.
    pub fn unfiltered(source: &ColumnStore) -> Self {
        Self {
            source: source.clone(),
            filters: Vec::new(),
            bits: source.int_set().clone(),
        }
    }

    /// The base store this view narrows.
    #[inline]
    pub fn source(&self) -> &ColumnStore {
        &self.source
    }

    /// Removes `filter` by rebuilding from the base store with the
    /// remaining filters re-applied in order. Returns the view unchanged
    /// when the filter was never applied.
    pub fn remove_filter(&self, filter: &ValueFilter) -> FilteredView {
        if !self.filters.contains(filter) {
            return self.clone();
        }
        let mut view = FilteredView::unfiltered(&self.source);
        for f in self.filters.iter().filter(|f| *f != filter) {
            view = view.filter(f.clone());
        }
        view
    }

    /// The applied filters with structurally redundant entries removed.
    /// Advisory, for display; the default policy drops exact duplicates
    /// only.
    pub fn simplified_filters(&self) -> Vec<ValueFilter> {
        let mut out: Vec<ValueFilter> = Vec::new();
        for f in &self.filters {
            if !out.contains(f) {
                out.push(f.clone());
            }
        }
        out
    }
}

impl Filterable for FilteredView {
    #[inline]
    fn size(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    fn int_set(&self) -> &IntSet {
        &self.bits
    }

    #[inline]
    fn filters(&self) -> &[ValueFilter] {
        &self.filters
    }

    fn filter(&self, filter: ValueFilter) -> FilteredView {
        if self.filters.contains(&filter) {
            return self.clone();
        }
        let bits = self.source.eval_filter(&self.bits, &filter);
        let mut filters = self.filters.clone();
        filters.push(filter);
        FilteredView::assemble(self.source.clone(), filters, bits)
    }

    #[inline]
    fn field(&self, identifier: &str) -> Option<&Column> {
        self.source.field(identifier)
    }

    #[inline]
    fn fields(&self) -> &[Arc<Column>] {
        self.source.fields()
    }

    #[inline]
    fn row_ids(&self) -> SetIter<'_> {
        self.bits.iter()
    }

    fn partition_ordered(&self, identifier: &str) -> Vec<(Value, FilteredView)> {
        self.source
            .partition_views(&self.bits, &self.filters, identifier)
    }
}

impl Display for FilteredView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FilteredView [{} of {} rows",
            self.bits.len(),
            self.source.size()
        )?;
        for filter in &self.filters {
            write!(f, ", {}", filter)?;
        }
        write!(f, "]")
    }
}
