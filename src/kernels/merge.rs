//! # **Merge Kernel** - *Cross-Representation Set Algebra*
//!
//! Two layers of machinery behind `IntSet::union` / `IntSet::intersection`:
//!
//! - **Ordered-iterator merges** - the lowest common denominator that works
//!   for any pair of representations. Union is a k-way merge emitting the
//!   smallest head and advancing every iterator that matched it;
//!   intersection leapfrogs the laggards via `skip_to` until all heads
//!   agree.
//! - **Word-parallel bitmap paths** - when both operands are packed, the
//!   result is computed 32 rows at a time over the aligned word windows,
//!   honouring each operand's `word_offset`.
//!
//! Callers pick the final representation afterwards; these functions only
//! produce raw ascending ids or raw words.

use crate::aliases::RowId;
use crate::structs::sets::bitmap::BitmapSet;
use crate::traits::row_set::OrderedIter;

/// K-way union of ascending iterators. Duplicates across operands are
/// emitted once.
pub fn union_of_ordered<I: OrderedIter>(mut iters: Vec<I>) -> Vec<RowId> {
    let mut out = Vec::new();
    loop {
        let mut lowest: Option<RowId> = None;
        for it in iters.iter_mut() {
            if let Some(head) = it.peek() {
                lowest = Some(lowest.map_or(head, |low: RowId| low.min(head)));
            }
        }
        let Some(next) = lowest else { break };
        out.push(next);
        for it in iters.iter_mut() {
            if it.peek() == Some(next) {
                it.next();
            }
        }
    }
    out
}

/// K-way intersection of ascending iterators. Empty input yields the
/// empty set.
pub fn intersection_of_ordered<I: OrderedIter>(mut iters: Vec<I>) -> Vec<RowId> {
    let mut out = Vec::new();
    if iters.is_empty() {
        return out;
    }
    'scan: loop {
        let Some(mut candidate) = iters[0].peek() else {
            break;
        };
        // raise the candidate until every head lands on it
        loop {
            let mut agreed = true;
            for it in iters.iter_mut() {
                it.skip_to(candidate);
                match it.peek() {
                    None => break 'scan,
                    Some(head) if head > candidate => {
                        candidate = head;
                        agreed = false;
                    }
                    _ => {}
                }
            }
            if agreed {
                break;
            }
        }
        out.push(candidate);
        for it in iters.iter_mut() {
            it.next();
        }
    }
    out
}

/// Word-parallel union over the combined word window of both operands.
pub fn bitmap_union(a: &BitmapSet, b: &BitmapSet) -> BitmapSet {
    if a.words.is_empty() {
        return b.clone();
    }
    if b.words.is_empty() {
        return a.clone();
    }
    let lo = a.word_offset.min(b.word_offset);
    let hi = a.word_end().max(b.word_end());
    let mut words = vec![0u32; hi - lo];
    for (i, &w) in a.words.iter().enumerate() {
        words[a.word_offset - lo + i] |= w;
    }
    for (i, &w) in b.words.iter().enumerate() {
        words[b.word_offset - lo + i] |= w;
    }
    BitmapSet::from_words(words, lo)
}

/// Word-parallel intersection over the overlapping word window. Disjoint
/// windows short-circuit to the empty bitmap.
pub fn bitmap_intersection(a: &BitmapSet, b: &BitmapSet) -> BitmapSet {
    let lo = a.word_offset.max(b.word_offset);
    let hi = a.word_end().min(b.word_end());
    if lo >= hi {
        return BitmapSet::from_words(Vec::new(), 0);
    }
    let words = (lo..hi)
        .map(|wi| a.words[wi - a.word_offset] & b.words[wi - b.word_offset])
        .collect();
    BitmapSet::from_words(words, lo)
}
