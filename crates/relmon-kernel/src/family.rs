//! Indexed families and their finite materialization.
//!
//! An indexed family is a lazy sequence of indices together with a pure
//! fibre function sending each index to a lazy sequence of elements.
//! Materializing samples both levels under explicit bounds.

use crate::lazy::{LazySequence, SliceOptions, SliceResult, slice_lazy_iterable};
use serde::{Deserialize, Serialize};

/// Fibre function of an indexed family.
///
/// Must be pure: the same index yields an observably identical sequence on
/// every call, though not necessarily the same instance.
pub type FibreFn<I, E> = Box<dyn Fn(&I) -> LazySequence<E>>;

pub struct IndexedFamily<I, E> {
    pub indices: LazySequence<I>,
    fibre: FibreFn<I, E>,
    default_index_limit: Option<usize>,
    default_element_limit: Option<usize>,
}

impl<I: Clone, E: Clone> IndexedFamily<I, E> {
    pub fn new(indices: LazySequence<I>, fibre: impl Fn(&I) -> LazySequence<E> + 'static) -> Self {
        Self {
            indices,
            fibre: Box::new(fibre),
            default_index_limit: None,
            default_element_limit: None,
        }
    }

    /// Limits used by [`materialize_indexed_family`] when the caller passes none.
    pub fn with_default_limits(
        mut self,
        index_limit: Option<usize>,
        element_limit: Option<usize>,
    ) -> Self {
        self.default_index_limit = index_limit;
        self.default_element_limit = element_limit;
        self
    }

    pub fn fibre(&self, index: &I) -> LazySequence<E> {
        (self.fibre)(index)
    }

    pub fn default_index_limit(&self) -> Option<usize> {
        self.default_index_limit
    }

    pub fn default_element_limit(&self) -> Option<usize> {
        self.default_element_limit
    }
}

impl<I, E> std::fmt::Debug for IndexedFamily<I, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedFamily")
            .field("indices", &self.indices)
            .field("default_index_limit", &self.default_index_limit)
            .field("default_element_limit", &self.default_element_limit)
            .finish_non_exhaustive()
    }
}

/// Wrap already-finite data. Every fibre is a finite sequence.
pub fn create_finite_indexed_family<I, E>(
    indices: Vec<I>,
    fibre: impl Fn(&I) -> Vec<E> + 'static,
) -> IndexedFamily<I, E>
where
    I: Clone,
    E: Clone,
{
    IndexedFamily::new(LazySequence::from_finite(indices), move |index| {
        LazySequence::from_finite(fibre(index))
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    pub index_limit: Option<usize>,
    pub element_limit: Option<usize>,
}

/// The sampled elements over one realized index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedFibre<I, E> {
    pub index: I,
    pub elements: SliceResult<E>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedFamily<I, E> {
    pub indices: SliceResult<I>,
    pub fibres: Vec<MaterializedFibre<I, E>>,
}

impl<I, E> MaterializedFamily<I, E> {
    /// True if the index slice or any fibre slice was truncated.
    pub fn truncated(&self) -> bool {
        self.indices.truncated || self.fibres.iter().any(|f| f.elements.truncated)
    }

    /// Total number of sampled elements across all fibres.
    pub fn element_count(&self) -> usize {
        self.fibres.iter().map(|f| f.elements.consumed).sum()
    }
}

/// Sample the family: indices first, then each realized fibre exactly once.
pub fn materialize_indexed_family<I, E>(
    family: &IndexedFamily<I, E>,
    options: MaterializeOptions,
) -> MaterializedFamily<I, E>
where
    I: Clone,
    E: Clone,
{
    let indices = slice_lazy_iterable(
        &family.indices,
        SliceOptions {
            limit: options.index_limit.or(family.default_index_limit),
            default_limit: None,
        },
    );

    let element_options = SliceOptions {
        limit: options.element_limit.or(family.default_element_limit),
        default_limit: None,
    };

    let fibres = indices
        .values
        .iter()
        .map(|index| {
            let fibre = family.fibre(index);
            MaterializedFibre {
                index: index.clone(),
                elements: slice_lazy_iterable(&fibre, element_options),
            }
        })
        .collect();

    let materialized = MaterializedFamily { indices, fibres };
    tracing::debug!(
        indices = materialized.indices.consumed,
        elements = materialized.element_count(),
        truncated = materialized.truncated(),
        "materialized indexed family"
    );
    materialized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy::{Countability, DEFAULT_SLICE_LIMIT};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn finite_family_materializes_completely() {
        let family = create_finite_indexed_family(vec![0usize, 1, 2], |i| vec!['x'; *i]);
        let result = materialize_indexed_family(&family, MaterializeOptions::default());

        assert_eq!(result.indices.values, vec![0, 1, 2]);
        assert!(!result.truncated());
        assert_eq!(result.fibres[2].elements.values, vec!['x', 'x']);
        assert_eq!(result.element_count(), 3);
    }

    #[test]
    fn each_realized_fibre_is_evaluated_once() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = calls.clone();
        let family = IndexedFamily::new(
            LazySequence::from_producer(0u32..).with_countability(Countability::CountablyInfinite),
            move |i: &u32| {
                seen.borrow_mut().push(*i);
                LazySequence::from_finite(vec![*i, *i + 1])
            },
        );

        let result = materialize_indexed_family(
            &family,
            MaterializeOptions {
                index_limit: Some(3),
                element_limit: Some(1),
            },
        );

        assert_eq!(*calls.borrow(), vec![0, 1, 2]);
        assert!(result.indices.truncated);
        assert!(result.fibres.iter().all(|f| f.elements.truncated));
        assert_eq!(result.element_count(), 3);
    }

    #[test]
    fn family_defaults_apply_when_options_are_empty() {
        let family = IndexedFamily::new(
            LazySequence::from_producer(0u8..).with_countability(Countability::CountablyInfinite),
            |i: &u8| {
                LazySequence::from_producer(std::iter::repeat(*i))
                    .with_countability(Countability::CountablyInfinite)
            },
        )
        .with_default_limits(Some(2), Some(4));

        let result = materialize_indexed_family(&family, MaterializeOptions::default());
        assert_eq!(result.indices.limit, 2);
        assert_eq!(result.fibres[1].elements.values, vec![1, 1, 1, 1]);

        let explicit = materialize_indexed_family(
            &family,
            MaterializeOptions {
                index_limit: Some(1),
                element_limit: None,
            },
        );
        assert_eq!(explicit.indices.values, vec![0]);
    }

    #[test]
    fn unbounded_family_falls_back_to_global_default() {
        let family = IndexedFamily::new(
            LazySequence::from_producer(0u16..).with_countability(Countability::CountablyInfinite),
            |_: &u16| LazySequence::<u16>::from_finite(vec![]),
        );
        let result = materialize_indexed_family(&family, MaterializeOptions::default());
        assert_eq!(result.indices.consumed, DEFAULT_SLICE_LIMIT);
        assert!(result.truncated());
        assert_eq!(result.element_count(), 0);
    }
}
