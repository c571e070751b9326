//! Property suite for the integer-set algebra: every representation of
//! the same abstract set must agree on membership, bounds, iteration
//! and algebra, and all operations are checked against a `BTreeSet`
//! model.

use std::collections::BTreeSet;

use proptest::prelude::*;

use minfacet::{BitmapSet, IntSet, IntSetBuilder, OrderedIter, Reducer, RowId, SortedSet};

fn rows() -> impl Strategy<Value = Vec<RowId>> {
    proptest::collection::btree_set(0usize..600, 0..120)
        .prop_map(|set| set.into_iter().collect())
}

/// Every representation capable of holding `rows`.
fn variants(rows: &[RowId]) -> Vec<IntSet> {
    let mut out = vec![IntSet::from_sorted(rows.to_vec())];
    out.push(IntSet::from(SortedSet::from_vec(rows.to_vec())));
    let mut b = BitmapSet::builder(rows.first().copied(), rows.last().copied());
    for &row in rows {
        b.push(row);
    }
    out.push(IntSet::from(b.finish()));
    out
}

fn model_union(a: &[RowId], b: &[RowId]) -> Vec<RowId> {
    let a: BTreeSet<_> = a.iter().copied().collect();
    let b: BTreeSet<_> = b.iter().copied().collect();
    a.union(&b).copied().collect()
}

fn model_intersection(a: &[RowId], b: &[RowId]) -> Vec<RowId> {
    let a: BTreeSet<_> = a.iter().copied().collect();
    let b: BTreeSet<_> = b.iter().copied().collect();
    a.intersection(&b).copied().collect()
}

proptest! {
    #[test]
    fn membership_and_bounds(rows in rows()) {
        for set in variants(&rows) {
            prop_assert_eq!(set.len(), rows.len());
            prop_assert_eq!(set.min(), rows.first().copied());
            prop_assert_eq!(set.max(), rows.last().copied());
            prop_assert_eq!(set.min().is_none(), set.is_empty());
            for &row in &rows {
                prop_assert!(set.has(row));
            }
            // probe around members for false positives
            for probe in 0..650 {
                prop_assert_eq!(set.has(probe), rows.binary_search(&probe).is_ok());
            }
        }
    }

    #[test]
    fn iteration_reproduces_input(rows in rows()) {
        for set in variants(&rows) {
            prop_assert_eq!(set.iter().collect::<Vec<_>>(), rows.clone());
            let mut via_each = Vec::new();
            set.each(|row| via_each.push(row));
            prop_assert_eq!(via_each, rows.clone());
        }
    }

    #[test]
    fn builder_reproduces_stream(rows in rows()) {
        let mut b = IntSetBuilder::new();
        for &row in &rows {
            b.push(row);
        }
        prop_assert_eq!(b.finish().iter().collect::<Vec<_>>(), rows);
    }

    #[test]
    fn union_matches_model(a in rows(), b in rows()) {
        let expected = model_union(&a, &b);
        for sa in variants(&a) {
            for sb in variants(&b) {
                let u = sa.union(&sb);
                prop_assert_eq!(u.iter().collect::<Vec<_>>(), expected.clone());
                // commutativity
                prop_assert_eq!(&u, &sb.union(&sa));
                // size lower bound
                prop_assert!(u.len() >= sa.len().max(sb.len()));
            }
        }
    }

    #[test]
    fn intersection_matches_model(a in rows(), b in rows()) {
        let expected = model_intersection(&a, &b);
        for sa in variants(&a) {
            for sb in variants(&b) {
                let i = sa.intersection(&sb);
                prop_assert_eq!(i.iter().collect::<Vec<_>>(), expected.clone());
                prop_assert_eq!(&i, &sb.intersection(&sa));
                prop_assert!(i.len() <= sa.len().min(sb.len()));
            }
        }
    }

    #[test]
    fn self_algebra_is_identity(rows in rows()) {
        let set = IntSet::from_sorted(rows);
        prop_assert_eq!(&set.union(&set), &set);
        prop_assert_eq!(&set.intersection(&set), &set);
    }

    #[test]
    fn variants_compare_equal(rows in rows()) {
        let all = variants(&rows);
        for a in &all {
            for b in &all {
                prop_assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn compacted_preserves_contents(rows in rows()) {
        for set in variants(&rows) {
            prop_assert_eq!(&set.compacted(), &set);
        }
    }

    #[test]
    fn skip_to_lands_on_first_at_or_above(rows in rows(), target in 0usize..700) {
        for set in variants(&rows) {
            let mut it = set.iter();
            it.skip_to(target);
            let expected = rows.iter().copied().find(|&row| row >= target);
            prop_assert_eq!(it.next(), expected);
        }
    }
}

#[test]
fn empty_set_properties() {
    let empty = IntSet::Empty;
    assert_eq!(empty.len(), 0);
    assert_eq!(empty.min(), None);
    assert_eq!(empty.max(), None);
    assert_eq!(empty.iter().next(), None);
    assert_eq!(empty, IntSet::from_sorted(vec![]));
    assert_eq!(empty, IntSet::from(SortedSet::from_vec(vec![])));
}
