//! # **Calculators Module** - *Auxiliary Ingestion Reducers*
//!
//! Reducers that ride along the ingestion pass: `RangeCalculator`
//! derives the numeric bounds of a number-typed column,
//! `ValueFrequencyCalculator` tallies value occurrences.

#[cfg(feature = "fast_hash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

use crate::enums::value::Value;
use crate::structs::field::NumericRange;
use crate::traits::reducer::Reducer;

/// Walks a numeric column computing `{min, max, integer_only}`.
/// Non-numeric and NaN cells are skipped, never fatal.
#[derive(Debug)]
pub struct RangeCalculator {
    min: f64,
    max: f64,
    integer_only: bool,
    seen: bool,
}

impl RangeCalculator {
    /// A calculator that has seen nothing yet.
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            integer_only: true,
            seen: false,
        }
    }

    /// Feeds a cell value; anything without a numeric payload is
    /// skipped.
    #[inline]
    pub fn observe(&mut self, value: &Value) {
        if let Some(n) = value.as_f64() {
            self.push(n);
        }
    }
}

impl Default for RangeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for RangeCalculator {
    type Item = f64;
    type Output = Option<NumericRange>;

    fn push(&mut self, n: f64) {
        if n.is_nan() {
            return;
        }
        self.seen = true;
        self.min = self.min.min(n);
        self.max = self.max.max(n);
        if n.fract() != 0.0 {
            self.integer_only = false;
        }
    }

    fn finish(self) -> Option<NumericRange> {
        self.seen
            .then(|| NumericRange::new(self.min, self.max, self.integer_only))
    }
}

/// Tallies how often each value occurs, preserving first-seen order.
#[derive(Debug, Default)]
pub struct ValueFrequencyCalculator {
    counts: HashMap<Value, usize>,
    order: Vec<Value>,
}

impl ValueFrequencyCalculator {
    /// An empty tally.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for ValueFrequencyCalculator {
    type Item = Value;
    type Output = Vec<(Value, usize)>;

    fn push(&mut self, value: Value) {
        match self.counts.get_mut(&value) {
            Some(count) => *count += 1,
            None => {
                self.order.push(value.clone());
                self.counts.insert(value, 1);
            }
        }
    }

    fn finish(mut self) -> Vec<(Value, usize)> {
        self.order
            .into_iter()
            .map(|value| {
                let count = self.counts.remove(&value).unwrap_or(0);
                (value, count)
            })
            .collect()
    }
}
