//! # Field Module - *Column Metadata Tagging*
//!
//! Defines column-level schema metadata shared by the ingestion source
//! and the sealed column store.
//!
//! A `FieldDescriptor` captures a column's identifier, display name,
//! value type, optional numeric range and distinct-value estimate.
//! This module contains only the schema description - it does not hold
//! any row data. Pair with `IndexedField` or `DenseField` to bind a
//! schema to actual values.
//!
//! Partial descriptors compose through `FieldDescriptorBuilder`: open an
//! existing descriptor with `to_builder()`, override what changed, and
//! `build()`. Later overrides win.

use std::fmt::{Display, Formatter};

use crate::enums::value::ValueType;

/// Distinct-value counts are tracked exactly up to this threshold; above
/// it estimates degrade to [`DistinctEstimate::Unlimited`].
pub const DISTINCT_LIMIT: usize = 1000;

/// Inclusive numeric bounds of a number-typed column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    /// True when every observed value was integral.
    pub integer_only: bool,
}

impl NumericRange {
    /// Constructs a new range.
    #[inline]
    pub fn new(min: f64, max: f64, integer_only: bool) -> Self {
        Self {
            min,
            max,
            integer_only,
        }
    }
}

/// How many distinct values a column holds.
///
/// Exact counts are only kept while they stay at or below
/// [`DISTINCT_LIMIT`]; beyond that the estimate is `Unlimited` and
/// distinct-value scanning is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctEstimate {
    /// Known exact count.
    Exact(usize),
    /// Too many to track; treated as unbounded.
    Unlimited,
}

impl DistinctEstimate {
    /// The exact count, if one is known.
    #[inline]
    pub fn exact(&self) -> Option<usize> {
        match self {
            DistinctEstimate::Exact(n) => Some(*n),
            DistinctEstimate::Unlimited => None,
        }
    }
}

/// # FieldDescriptor
///
/// Column-level schema metadata.
///
/// ## Description
/// - `identifier` is unique within a store; `display_name` is advisory
///   and defaults to the identifier.
/// - `range` is populated for number-typed columns only.
/// - `type_constructor` is carried for object-typed columns and
///   round-trips through persistence, but nothing dispatches on it.
///
/// ## Example
/// ```rust
/// use minfacet::{FieldDescriptor, ValueType};
///
/// let fd = FieldDescriptor::builder("qty", ValueType::Num)
///     .display_name("Quantity")
///     .build();
/// assert_eq!(fd.identifier, "qty");
/// assert_eq!(fd.display_name, "Quantity");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub identifier: String,
    pub display_name: String,
    pub value_type: ValueType,
    /// Numeric bounds; `None` unless `value_type` is `Num` and a range
    /// has been computed or supplied.
    pub range: Option<NumericRange>,
    /// `None` until computed by ingestion or supplied up front.
    pub distinct_estimate: Option<DistinctEstimate>,
    /// True when a row may carry more than one value for this field.
    pub multi_valued: bool,
    /// Constructor name for object-typed values. Preserved, never
    /// dispatched on.
    pub type_constructor: Option<String>,
}

impl FieldDescriptor {
    /// Constructs a descriptor with defaults: display name mirrors the
    /// identifier, unary, no range, no estimate.
    pub fn new(identifier: impl Into<String>, value_type: ValueType) -> Self {
        let identifier = identifier.into();
        FieldDescriptor {
            display_name: identifier.clone(),
            identifier,
            value_type,
            range: None,
            distinct_estimate: None,
            multi_valued: false,
            type_constructor: None,
        }
    }

    /// Opens a builder seeded with defaults.
    pub fn builder(identifier: impl Into<String>, value_type: ValueType) -> FieldDescriptorBuilder {
        FieldDescriptorBuilder {
            inner: FieldDescriptor::new(identifier, value_type),
        }
    }

    /// Re-opens this descriptor for override composition.
    pub fn to_builder(&self) -> FieldDescriptorBuilder {
        FieldDescriptorBuilder {
            inner: self.clone(),
        }
    }
}

impl Display for FieldDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Field \"{}\": {}{}",
            self.identifier,
            self.value_type,
            if self.multi_valued { " (multi-valued)" } else { "" }
        )
    }
}

/// Typed override composition for [`FieldDescriptor`], replacing
/// free-form partial-descriptor merging: each setter overwrites the
/// current state, so applying overrides in sequence keeps
/// last-writer-wins semantics.
#[derive(Debug, Clone)]
pub struct FieldDescriptorBuilder {
    inner: FieldDescriptor,
}

impl FieldDescriptorBuilder {
    /// Overrides the display name.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.inner.display_name = name.into();
        self
    }

    /// Supplies a precomputed numeric range.
    pub fn range(mut self, range: NumericRange) -> Self {
        self.inner.range = Some(range);
        self
    }

    /// Supplies a distinct-value count; counts above
    /// [`DISTINCT_LIMIT`] degrade to `Unlimited`.
    pub fn distinct_values(mut self, count: usize) -> Self {
        self.inner.distinct_estimate = Some(if count <= DISTINCT_LIMIT {
            DistinctEstimate::Exact(count)
        } else {
            DistinctEstimate::Unlimited
        });
        self
    }

    /// Forces an unbounded estimate, disabling distinct-value scanning.
    pub fn unlimited_values(mut self) -> Self {
        self.inner.distinct_estimate = Some(DistinctEstimate::Unlimited);
        self
    }

    /// Marks the field as holding multiple values per row.
    pub fn multi_valued(mut self, multi: bool) -> Self {
        self.inner.multi_valued = multi;
        self
    }

    /// Attaches an object constructor name.
    pub fn type_constructor(mut self, name: impl Into<String>) -> Self {
        self.inner.type_constructor = Some(name.into());
        self
    }

    /// Finishes the descriptor.
    pub fn build(self) -> FieldDescriptor {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let fd = FieldDescriptor::new("color", ValueType::Str);
        assert_eq!(fd.display_name, "color");
        assert_eq!(fd.range, None);
        assert_eq!(fd.distinct_estimate, None);
        assert!(!fd.multi_valued);
    }

    #[test]
    fn test_builder_overrides_compose() {
        let base = FieldDescriptor::builder("qty", ValueType::Num)
            .display_name("Qty")
            .distinct_values(12)
            .build();
        // later overrides win
        let merged = base
            .to_builder()
            .display_name("Quantity")
            .range(NumericRange::new(0.0, 9.0, true))
            .build();
        assert_eq!(merged.display_name, "Quantity");
        assert_eq!(merged.distinct_estimate, Some(DistinctEstimate::Exact(12)));
        assert_eq!(merged.range, Some(NumericRange::new(0.0, 9.0, true)));
    }

    #[test]
    fn test_distinct_estimate_caps() {
        let fd = FieldDescriptor::builder("id", ValueType::Str)
            .distinct_values(5000)
            .build();
        assert_eq!(fd.distinct_estimate, Some(DistinctEstimate::Unlimited));
        assert_eq!(fd.distinct_estimate.unwrap().exact(), None);
    }
}
