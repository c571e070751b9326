//! # **RowSet Trait** - *Shared Integer-Set Behaviour*
//!
//! The behavioural contract every set representation honours, plus the
//! ordered-iterator contract that cross-representation algebra is built on.
//!
//! Membership, bounds and cardinality must stay mutually consistent:
//! `min()` is `None` exactly when `len()` is `0`, and iteration visits
//! exactly `len()` elements in strictly ascending order.

use crate::aliases::RowId;

/// Common operations over an immutable set of row ids.
///
/// Implemented by the concrete representations
/// ([`RangeSet`](crate::structs::sets::range::RangeSet),
/// [`SortedSet`](crate::structs::sets::sorted::SortedSet),
/// [`BitmapSet`](crate::structs::sets::bitmap::BitmapSet)) and by the
/// [`IntSet`](crate::enums::set::IntSet) enum that dispatches across them.
pub trait RowSet {
    /// Membership test.
    fn has(&self, row: RowId) -> bool;

    /// Smallest element, or `None` when empty.
    fn min(&self) -> Option<RowId>;

    /// Largest element, or `None` when empty.
    fn max(&self) -> Option<RowId>;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns true if the set holds no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes `action` for every element in strictly ascending order.
    fn each<F: FnMut(RowId)>(&self, action: F);
}

/// Pull iterator over a set, ascending.
///
/// `next()` past the end yields `None` - callers check rather than catch.
/// `skip_to(target)` advances so the next element returned is the first
/// one `>= target`; a target at or below the current head is a no-op.
pub trait OrderedIter: Iterator<Item = RowId> {
    /// The next element without consuming it.
    fn peek(&mut self) -> Option<RowId>;

    /// Advances past every element `< target`.
    fn skip_to(&mut self, target: RowId);
}
