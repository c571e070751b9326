//! # **IndexedField Module** - *Value → Row-Set Column Index*
//!
//! A column stored as an ordered list of distinct values plus, for each
//! value, the set of rows containing it. This is the shape filtering
//! loves: an equality filter is a map lookup and one set intersection,
//! never a row scan.
//!
//! ## Behaviour
//! - Value order is first-seen at build time, or exactly the order
//!   supplied to `IndexedFieldBuilder::with_values` - declared values
//!   that never occur keep an empty set, and stay enumerable.
//! - A row may appear in zero, one or several value sets (multi-valued
//!   columns).
//! - Lookups are keyed by the typed [`Value`]; the string form is only
//!   used in the serialized shape.

#[cfg(feature = "fast_hash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

use crate::aliases::RowId;
use crate::enums::set::{IntSet, IntSetBuilder};
use crate::enums::value::Value;
use crate::structs::field::{DistinctEstimate, FieldDescriptor};
use crate::traits::reducer::Reducer;

static EMPTY_SET: IntSet = IntSet::Empty;

/// # IndexedField
///
/// Column index mapping each distinct value to the rows containing it.
///
/// ## Example
/// ```rust
/// use minfacet::{IndexedFieldBuilder, FieldDescriptor, Value, ValueType};
///
/// let mut b = IndexedFieldBuilder::new(FieldDescriptor::new("tag", ValueType::Str));
/// for (row, tag) in ["a", "b", "a", "c", "a"].iter().enumerate() {
///     b.insert(row, Value::from(*tag));
/// }
/// let field = b.finish();
/// assert_eq!(field.all_values().len(), 3);
/// assert_eq!(
///     field.int_set_for_value(&Value::from("a")).iter().collect::<Vec<_>>(),
///     vec![0, 2, 4]
/// );
/// assert!(field.row_has_value(3, &Value::from("c")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedField {
    /// Column metadata.
    pub descriptor: FieldDescriptor,
    values: Vec<Value>,
    sets: Vec<IntSet>,
    index: HashMap<Value, usize>,
}

impl IndexedField {
    /// Reassembles a column from ordered `(value, row set)` entries, as
    /// the persistence layer does. Declared-but-empty values are kept.
    pub fn from_entries(
        descriptor: FieldDescriptor,
        entries: Vec<(Value, IntSet)>,
    ) -> Result<Self, crate::enums::error::MinfacetError> {
        let mut values = Vec::with_capacity(entries.len());
        let mut sets = Vec::with_capacity(entries.len());
        let mut index = HashMap::default();
        for (value, set) in entries {
            if index.insert(value.clone(), values.len()).is_some() {
                return Err(crate::enums::error::MinfacetError::Metadata {
                    message: format!(
                        "field '{}' lists value '{}' twice",
                        descriptor.identifier, value
                    ),
                });
            }
            values.push(value);
            sets.push(set);
        }
        let mut descriptor = descriptor;
        descriptor.distinct_estimate = Some(DistinctEstimate::Exact(values.len()));
        Ok(Self {
            descriptor,
            values,
            sets,
            index,
        })
    }

    /// The ordered distinct values.
    #[inline]
    pub fn all_values(&self) -> &[Value] {
        &self.values
    }

    /// The row set for `value`, or the canonical empty set for values
    /// this column has never heard of.
    #[inline]
    pub fn int_set_for_value(&self, value: &Value) -> &IntSet {
        match self.index.get(value) {
            Some(&i) => &self.sets[i],
            None => &EMPTY_SET,
        }
    }

    /// Constant-time membership test via the value's set.
    #[inline]
    pub fn row_has_value(&self, row: RowId, value: &Value) -> bool {
        self.int_set_for_value(value).has(row)
    }

    /// Every value `row` carries, in value order. Runs in
    /// O(distinct values).
    pub fn values(&self, row: RowId) -> Vec<Value> {
        self.values
            .iter()
            .zip(&self.sets)
            .filter(|(_, set)| set.has(row))
            .map(|(value, _)| value.clone())
            .collect()
    }

    /// Exactly `all_values().len()`.
    #[inline]
    pub fn distinct_estimate(&self) -> DistinctEstimate {
        DistinctEstimate::Exact(self.values.len())
    }

    /// Ordered `(value, row set)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&Value, &IntSet)> {
        self.values.iter().zip(&self.sets)
    }

    /// Occurrence tally per value, in value order.
    pub fn value_counts(&self) -> Vec<(Value, usize)> {
        self.entries()
            .map(|(value, set)| (value.clone(), set.len()))
            .collect()
    }
}

/// One-pass builder: feed `(row, value)` pairs with ascending rows, then
/// seal. Each per-value set is compacted to its cheapest representation
/// at seal time.
#[derive(Debug)]
pub struct IndexedFieldBuilder {
    descriptor: FieldDescriptor,
    values: Vec<Value>,
    builders: Vec<IntSetBuilder>,
    index: HashMap<Value, usize>,
    whitelist: bool,
}

impl IndexedFieldBuilder {
    /// Builder with first-seen value ordering.
    pub fn new(descriptor: FieldDescriptor) -> Self {
        Self {
            descriptor,
            values: Vec::new(),
            builders: Vec::new(),
            index: HashMap::default(),
            whitelist: false,
        }
    }

    /// Builder with an explicit value list: output order follows
    /// `values` exactly, values outside the list are ignored, and listed
    /// values that never occur keep empty sets.
    pub fn with_values(descriptor: FieldDescriptor, values: Vec<Value>) -> Self {
        let mut b = Self::new(descriptor);
        b.whitelist = true;
        for value in values {
            b.register(value);
        }
        b
    }

    fn register(&mut self, value: Value) -> usize {
        let slot = self.values.len();
        self.index.insert(value.clone(), slot);
        self.values.push(value);
        self.builders.push(IntSetBuilder::new());
        slot
    }

    /// Records that `row` carries `value`. Rows must arrive in ascending
    /// order; feeding the same `(row, value)` pair twice is a no-op.
    pub fn insert(&mut self, row: RowId, value: Value) {
        let slot = match self.index.get(&value) {
            Some(&slot) => slot,
            None if self.whitelist => return,
            None => self.register(value),
        };
        if self.builders[slot].last() == Some(row) {
            return;
        }
        self.builders[slot].push(row);
    }

    /// Number of distinct values registered so far.
    #[inline]
    pub fn distinct_count(&self) -> usize {
        self.values.len()
    }

    /// Seals every per-value set and finishes the column.
    pub fn finish(self) -> IndexedField {
        let sets = self.builders.into_iter().map(|b| b.finish()).collect();
        let mut descriptor = self.descriptor;
        descriptor.distinct_estimate = Some(DistinctEstimate::Exact(self.values.len()));
        IndexedField {
            descriptor,
            values: self.values,
            sets,
            index: self.index,
        }
    }
}

impl Reducer for IndexedFieldBuilder {
    type Item = (RowId, Value);
    type Output = IndexedField;

    #[inline]
    fn push(&mut self, (row, value): (RowId, Value)) {
        self.insert(row, value);
    }

    #[inline]
    fn finish(self) -> IndexedField {
        IndexedFieldBuilder::finish(self)
    }
}
