//! Bounded approximation of Kan extensions by frontier search.
//!
//! The colimit/limit formula for a Kan extension ranges over every path
//! through the indexing category. Here that is approximated by a
//! breadth-first walk: seeds `(index, element)` at depth 0 are pushed
//! through user-supplied symbolic arrows, each step one deeper, until the
//! depth bound stops expansion or the breadth bound stops the search.
//!
//! The result is a set, exposed as an ordered sequence for determinism:
//! arrows are tried in the order supplied, images in the order the arrow's
//! map produces them.

use crate::config::KanConfig;
use crate::family::IndexedFamily;
use crate::lazy::{LazySequence, SliceOptions, SliceResult, slice_lazy_iterable};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A node of the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanFrontier<I, E> {
    pub index: I,
    pub element: E,
    pub depth: usize,
}

/// A partial transition `source -> target` acting on fibre elements.
pub struct SymbolicArrow<I, E> {
    pub source: I,
    pub target: I,
    map: Box<dyn Fn(&E) -> LazySequence<E>>,
}

impl<I, E: Clone> SymbolicArrow<I, E> {
    pub fn new(source: I, target: I, map: impl Fn(&E) -> LazySequence<E> + 'static) -> Self {
        Self {
            source,
            target,
            map: Box::new(map),
        }
    }

    /// An arrow whose images are always finite.
    pub fn finite(source: I, target: I, map: impl Fn(&E) -> Vec<E> + 'static) -> Self {
        Self::new(source, target, move |e| LazySequence::from_finite(map(e)))
    }

    pub fn images(&self, element: &E) -> LazySequence<E> {
        (self.map)(element)
    }
}

impl<I: std::fmt::Debug, E> std::fmt::Debug for SymbolicArrow<I, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolicArrow")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Caller-supplied serialization used to deduplicate `(index, element)` pairs.
pub type FrontierKeyFn<I, E> = Box<dyn Fn(&I, &E) -> String>;

/// Everything the approximator needs: seeds, arrows, a dedup key, and an
/// optional family whose index sequence restricts which indices count.
pub struct KanExtensionWitness<I, E> {
    pub seeds: Vec<(I, E)>,
    pub arrows: Vec<SymbolicArrow<I, E>>,
    pub family: Option<IndexedFamily<I, E>>,
    key: FrontierKeyFn<I, E>,
}

impl<I, E> KanExtensionWitness<I, E> {
    pub fn new(
        seeds: Vec<(I, E)>,
        arrows: Vec<SymbolicArrow<I, E>>,
        key: impl Fn(&I, &E) -> String + 'static,
    ) -> Self {
        Self {
            seeds,
            arrows,
            family: None,
            key: Box::new(key),
        }
    }

    /// Only indices appearing in a bounded slice of `family.indices` are explored.
    pub fn restricted_to(mut self, family: IndexedFamily<I, E>) -> Self {
        self.family = Some(family);
        self
    }

    pub fn key(&self, index: &I, element: &E) -> String {
        (self.key)(index, element)
    }
}

/// Search bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KanApproximationOptions {
    pub depth_limit: usize,
    pub breadth_limit: usize,
    /// Slice bound for the allowed-index restriction.
    pub index_limit: usize,
}

impl Default for KanApproximationOptions {
    fn default() -> Self {
        Self::from(&KanConfig::default())
    }
}

impl From<&KanConfig> for KanApproximationOptions {
    fn from(config: &KanConfig) -> Self {
        Self {
            depth_limit: config.depth_limit,
            breadth_limit: config.breadth_limit,
            index_limit: config.index_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanExtensionApproximation<I, E> {
    pub explored: Vec<KanFrontier<I, E>>,
    /// The search stopped at the breadth bound or the index restriction was
    /// cut short, so `explored` may miss reachable nodes.
    pub truncated: bool,
    /// The search itself stopped at the breadth bound with work left.
    pub breadth_truncated: bool,
    pub depth_limit: usize,
    pub breadth_limit: usize,
    /// The slice backing the allowed-index restriction, if any.
    pub index_slice: Option<SliceResult<I>>,
}

impl<I: PartialEq, E> KanExtensionApproximation<I, E> {
    /// Explored elements sitting over `index`, in exploration order.
    pub fn elements_over(&self, index: &I) -> Vec<&E> {
        self.explored
            .iter()
            .filter(|node| &node.index == index)
            .map(|node| &node.element)
            .collect()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.explored.iter().map(|node| node.depth).max()
    }
}

/// Breadth-first frontier exploration bounded by depth and breadth.
pub fn approximate_kan_extension<I, E>(
    witness: &KanExtensionWitness<I, E>,
    options: KanApproximationOptions,
) -> KanExtensionApproximation<I, E>
where
    I: Clone + PartialEq,
    E: Clone,
{
    let KanApproximationOptions {
        depth_limit,
        breadth_limit,
        index_limit,
    } = options;

    let index_slice = witness
        .family
        .as_ref()
        .map(|family| slice_lazy_iterable(&family.indices, SliceOptions::limit(index_limit)));
    // An empty restriction means unrestricted.
    let allowed = index_slice.as_ref().filter(|slice| !slice.is_empty());

    let mut queue: VecDeque<KanFrontier<I, E>> = witness
        .seeds
        .iter()
        .map(|(index, element)| KanFrontier {
            index: index.clone(),
            element: element.clone(),
            depth: 0,
        })
        .collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut explored: Vec<KanFrontier<I, E>> = Vec::new();
    let mut breadth_truncated = false;

    while let Some(node) = queue.pop_front() {
        if let Some(slice) = allowed {
            if !slice.values.contains(&node.index) {
                tracing::trace!(depth = node.depth, "discarded node outside allowed indices");
                continue;
            }
        }

        if !seen.insert(witness.key(&node.index, &node.element)) {
            continue;
        }

        if explored.len() >= breadth_limit {
            breadth_truncated = true;
            break;
        }
        explored.push(node.clone());

        if node.depth >= depth_limit {
            continue;
        }

        'arrows: for arrow in witness.arrows.iter().filter(|a| a.source == node.index) {
            let images = arrow.images(&node.element);
            for image in images.enumerate() {
                if explored.len() + queue.len() >= breadth_limit {
                    breadth_truncated = true;
                    break 'arrows;
                }
                queue.push_back(KanFrontier {
                    index: arrow.target.clone(),
                    element: image,
                    depth: node.depth + 1,
                });
            }
        }
    }

    if !queue.is_empty() {
        breadth_truncated = true;
    }
    let index_truncated = index_slice.as_ref().is_some_and(|slice| slice.truncated);
    let truncated = breadth_truncated || index_truncated;

    if truncated {
        tracing::warn!(
            explored = explored.len(),
            breadth_limit,
            breadth_truncated,
            index_truncated,
            "kan extension approximation truncated"
        );
    } else {
        tracing::debug!(explored = explored.len(), "kan extension approximation complete");
    }

    KanExtensionApproximation {
        explored,
        truncated,
        breadth_truncated,
        depth_limit,
        breadth_limit,
        index_slice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::create_finite_indexed_family;

    fn key(i: &u8, e: &i32) -> String {
        format!("{i}:{e}")
    }

    fn options(depth_limit: usize, breadth_limit: usize) -> KanApproximationOptions {
        KanApproximationOptions {
            depth_limit,
            breadth_limit,
            index_limit: 8,
        }
    }

    #[test]
    fn no_arrows_returns_deduplicated_seeds() {
        let witness = KanExtensionWitness::new(vec![(0u8, 1), (0, 1), (1, 2)], vec![], key);
        let result = approximate_kan_extension(&witness, options(3, 2));

        assert_eq!(result.explored.len(), 2);
        assert!(!result.truncated);
        assert!(result.explored.iter().all(|n| n.depth == 0));
    }

    #[test]
    fn follows_arrows_breadth_first() {
        let arrows = vec![
            SymbolicArrow::finite(0u8, 1u8, |e: &i32| vec![e + 10, e + 20]),
            SymbolicArrow::finite(1u8, 2u8, |e: &i32| vec![e * 2]),
        ];
        let witness = KanExtensionWitness::new(vec![(0, 1)], arrows, key);
        let result = approximate_kan_extension(&witness, options(5, 100));

        let order: Vec<(u8, i32, usize)> = result
            .explored
            .iter()
            .map(|n| (n.index, n.element, n.depth))
            .collect();
        assert_eq!(
            order,
            vec![(0, 1, 0), (1, 11, 1), (1, 21, 1), (2, 22, 2), (2, 42, 2)]
        );
        assert!(!result.truncated);
        assert_eq!(result.elements_over(&2), vec![&22, &42]);
    }

    #[test]
    fn depth_limit_suppresses_expansion() {
        let arrows = vec![SymbolicArrow::finite(0u8, 0u8, |e: &i32| vec![e + 1])];
        let witness = KanExtensionWitness::new(vec![(0, 0)], arrows, key);
        let result = approximate_kan_extension(&witness, options(2, 100));

        assert_eq!(result.explored.len(), 3);
        assert_eq!(result.max_depth(), Some(2));
        assert!(!result.truncated);
    }

    #[test]
    fn cycles_are_explored_once() {
        let arrows = vec![
            SymbolicArrow::finite(0u8, 1u8, |e: &i32| vec![*e]),
            SymbolicArrow::finite(1u8, 0u8, |e: &i32| vec![*e]),
        ];
        let witness = KanExtensionWitness::new(vec![(0, 7)], arrows, key);
        let result = approximate_kan_extension(&witness, options(10, 100));

        assert_eq!(result.explored.len(), 2);
    }

    #[test]
    fn breadth_limit_truncates_infinite_images() {
        let arrows = vec![SymbolicArrow::new(0u8, 1u8, |_: &i32| {
            LazySequence::from_producer(0i32..)
        })];
        let witness = KanExtensionWitness::new(vec![(0, 0)], arrows, key);
        let result = approximate_kan_extension(&witness, options(3, 5));

        assert!(result.truncated);
        assert_eq!(result.explored.len(), 5);
    }

    #[test]
    fn allowed_indices_discard_without_counting() {
        let arrows = vec![
            SymbolicArrow::finite(0u8, 9u8, |e: &i32| vec![e + 1, e + 2, e + 3]),
            SymbolicArrow::finite(0u8, 1u8, |e: &i32| vec![e * 10]),
        ];
        let family = create_finite_indexed_family(vec![0u8, 1], |_| Vec::<i32>::new());
        let witness = KanExtensionWitness::new(vec![(0, 1)], arrows, key).restricted_to(family);
        let result = approximate_kan_extension(&witness, options(3, 10));

        let indices: Vec<u8> = result.explored.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert!(!result.truncated);
        assert_eq!(result.index_slice.as_ref().map(|s| s.consumed), Some(2));
    }

    #[test]
    fn cut_short_restriction_marks_result_truncated() {
        let arrows = vec![SymbolicArrow::finite(0u8, 1u8, |e: &i32| vec![*e])];
        let family = create_finite_indexed_family(vec![0u8, 1, 2], |_| Vec::<i32>::new());
        let witness = KanExtensionWitness::new(vec![(0, 1)], arrows, key).restricted_to(family);
        let result = approximate_kan_extension(
            &witness,
            KanApproximationOptions {
                depth_limit: 3,
                breadth_limit: 10,
                index_limit: 1,
            },
        );

        // Index 1 was never sliced, so its image is discarded.
        assert_eq!(result.explored.len(), 1);
        assert!(!result.breadth_truncated);
        assert!(result.truncated);
        assert_eq!(result.index_slice.as_ref().map(|s| s.truncated), Some(true));
    }

    #[test]
    fn empty_restriction_means_unrestricted() {
        let arrows = vec![SymbolicArrow::finite(0u8, 3u8, |e: &i32| vec![*e])];
        let family = create_finite_indexed_family(Vec::<u8>::new(), |_| Vec::<i32>::new());
        let witness = KanExtensionWitness::new(vec![(0, 1)], arrows, key).restricted_to(family);
        let result = approximate_kan_extension(&witness, options(3, 10));
        assert_eq!(result.explored.len(), 2);
    }
}
