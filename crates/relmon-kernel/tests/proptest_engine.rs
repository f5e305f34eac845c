//! Property tests for the bounded enumeration engine

use proptest::prelude::*;
use relmon_kernel::linear::{count_vectors, enumerate_vectors};
use relmon_kernel::{
    BooleanSemiring, KanApproximationOptions, KanExtensionWitness, LazySequence, ModularSemiring,
    SliceOptions, SymbolicArrow, UnionFind, approximate_kan_extension, slice_lazy_iterable,
};
use std::collections::HashSet;

/// `(source, target, step)` edges over nodes `0..4`, acting on residues mod 5.
fn arb_graph() -> impl Strategy<Value = Vec<(u8, u8, i64)>> {
    prop::collection::vec((0u8..4, 0u8..4, 0i64..5), 0..8)
}

fn build_witness(edges: &[(u8, u8, i64)], seeds: Vec<(u8, i64)>) -> KanExtensionWitness<u8, i64> {
    let arrows = edges
        .iter()
        .map(|&(source, target, step)| {
            SymbolicArrow::finite(source, target, move |x: &i64| {
                vec![(x + step) % 5, (x * 2 + step) % 5]
            })
        })
        .collect();
    KanExtensionWitness::new(seeds, arrows, |index, element| format!("{index}:{element}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A finite slice is the prefix, truncated exactly when elements are left over
    #[test]
    fn finite_slice_is_prefix(items in prop::collection::vec(any::<u16>(), 0..40), limit in 0usize..50) {
        let sequence = LazySequence::from_finite(items.clone());
        let slice = slice_lazy_iterable(&sequence, SliceOptions::limit(limit));

        let expected: Vec<u16> = items.iter().copied().take(limit).collect();
        prop_assert_eq!(&slice.values, &expected);
        prop_assert_eq!(slice.consumed, expected.len());
        prop_assert_eq!(slice.truncated, items.len() > limit);
    }

    /// An infinite producer always fills the limit and is always truncated
    #[test]
    fn infinite_slice_fills_limit(start in any::<u32>(), limit in 0usize..64) {
        let sequence = LazySequence::from_producer((start as u64)..);
        let slice = slice_lazy_iterable(&sequence, SliceOptions::limit(limit));

        prop_assert_eq!(slice.len(), limit);
        prop_assert!(slice.truncated);
        let again = slice_lazy_iterable(&sequence, SliceOptions::limit(limit));
        prop_assert_eq!(again.values, slice.values);
    }

    /// Search respects its bounds and never revisits a node
    #[test]
    fn kan_search_respects_bounds(
        edges in arb_graph(),
        seed in 0i64..5,
        depth_limit in 0usize..5,
        breadth_limit in 1usize..30,
    ) {
        let witness = build_witness(&edges, vec![(0, seed)]);
        let result = approximate_kan_extension(
            &witness,
            KanApproximationOptions { depth_limit, breadth_limit, index_limit: 8 },
        );

        prop_assert!(result.explored.len() <= breadth_limit);
        prop_assert!(result.explored.iter().all(|node| node.depth <= depth_limit));
        let keys: HashSet<(u8, i64)> =
            result.explored.iter().map(|node| (node.index, node.element)).collect();
        prop_assert_eq!(keys.len(), result.explored.len());
        prop_assert_eq!(result.explored.first().map(|node| (node.index, node.element)), Some((0, seed)));
    }

    /// Without truncation, raising the breadth bound changes nothing
    #[test]
    fn untruncated_search_is_stable(edges in arb_graph(), depth_limit in 0usize..4) {
        let witness = build_witness(&edges, vec![(0, 0), (1, 3)]);
        // 4 nodes × 5 residues bounds the reachable set.
        let roomy = KanApproximationOptions { depth_limit, breadth_limit: 1000, index_limit: 8 };
        let first = approximate_kan_extension(&witness, roomy);
        prop_assert!(!first.truncated);

        let roomier = KanApproximationOptions { breadth_limit: 5000, ..roomy };
        let second = approximate_kan_extension(&witness, roomier);
        prop_assert_eq!(first.explored, second.explored);
    }

    /// Union-find agrees with a naive relabelling partition
    #[test]
    fn union_find_matches_naive_partition(
        size in 1usize..20,
        pairs in prop::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..30),
    ) {
        let mut uf = UnionFind::new(size);
        let mut label: Vec<usize> = (0..size).collect();
        for (a, b) in &pairs {
            let (a, b) = (a.index(size), b.index(size));
            uf.union(a, b);
            let (from, to) = (label[b], label[a]);
            for l in label.iter_mut() {
                if *l == from {
                    *l = to;
                }
            }
        }
        for a in 0..size {
            for b in 0..size {
                prop_assert_eq!(uf.same_class(a, b), label[a] == label[b]);
            }
        }
        let distinct: HashSet<usize> = label.iter().copied().collect();
        prop_assert_eq!(uf.class_count(), distinct.len());
    }

    /// |R^d| = |R|^d, and every enumerated vector is distinct
    #[test]
    fn vector_enumeration_counts(dimension in 0usize..6, modulus in 1u64..4) {
        let boolean = BooleanSemiring::new();
        prop_assert_eq!(enumerate_vectors(&boolean, dimension).unwrap().len(), 1 << dimension);

        let modular = ModularSemiring::new(modulus).unwrap();
        let vectors = enumerate_vectors(&modular, dimension).unwrap();
        prop_assert_eq!(vectors.len(), (modulus as usize).pow(dimension as u32));
        prop_assert_eq!(vectors.len(), count_vectors(&modular, dimension));
        let distinct: HashSet<&Vec<u64>> = vectors.iter().collect();
        prop_assert_eq!(distinct.len(), vectors.len());
    }
}
