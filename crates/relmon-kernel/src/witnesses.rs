//! Canonical witnesses for the analyses.
//!
//! These are the fixtures callers reach for first: the boolean semiring
//! versions of the vector laws (one deliberately broken), a natural-number
//! powerset probe, and a small symbolic graph for the Kan approximator.

use crate::family::create_finite_indexed_family;
use crate::kan::{KanExtensionWitness, SymbolicArrow};
use crate::lazy::{Countability, LazySequence};
use crate::linear::canonical_extend_vector;
use crate::powerset::{PowersetArrow, PowersetRelativeMonadWitness};
use crate::quotient::FiniteVectorLeftKanExtensionWitness;
use crate::semiring::BooleanSemiring;
use crate::vector_monad::{FiniteVectorArrowCorrespondenceWitness, FiniteVectorWitness};
use std::rc::Rc;

pub fn describe_boolean_vector_relative_monad_witness(
    dimensions: &[i64],
) -> FiniteVectorWitness<BooleanSemiring> {
    FiniteVectorWitness::new(BooleanSemiring::new(), dimensions.to_vec())
}

pub fn describe_boolean_vector_kleisli_splitting_witness(
    dimensions: &[i64],
) -> FiniteVectorWitness<BooleanSemiring> {
    FiniteVectorWitness::new(BooleanSemiring::new(), dimensions.to_vec())
}

pub fn describe_boolean_vector_arrow_correspondence_witness(
    dimensions: &[i64],
) -> FiniteVectorArrowCorrespondenceWitness<BooleanSemiring> {
    FiniteVectorArrowCorrespondenceWitness::canonical(
        describe_boolean_vector_relative_monad_witness(dimensions),
    )
}

/// Like the canonical correspondence witness, but the action negates the
/// first output coordinate. Every codomain of size at least one mismatches.
pub fn describe_broken_boolean_vector_arrow_correspondence_witness(
    dimensions: &[i64],
) -> FiniteVectorArrowCorrespondenceWitness<BooleanSemiring> {
    let semiring = BooleanSemiring::new();
    FiniteVectorArrowCorrespondenceWitness {
        base: describe_boolean_vector_relative_monad_witness(dimensions),
        arrow_action: Box::new(move |domain, codomain, arrow, vector| {
            let mut image = canonical_extend_vector(&semiring, domain, codomain, arrow, vector)?;
            if let Some(first) = image.first_mut() {
                *first = !*first;
            }
            Ok(image)
        }),
    }
}

pub fn describe_boolean_vector_left_kan_extension_witness(
    dimension_limit: usize,
    target_sizes: &[i64],
) -> FiniteVectorLeftKanExtensionWitness<BooleanSemiring> {
    FiniteVectorLeftKanExtensionWitness::new(
        BooleanSemiring::new(),
        dimension_limit,
        target_sizes.to_vec(),
    )
}

/// Naturals with a handful of arrows. The base and subset sequences are
/// countably infinite, so any probe over this witness is truncated.
pub fn describe_natural_number_powerset_witness() -> PowersetRelativeMonadWitness<u64> {
    let base = LazySequence::from_producer(0u64..).with_countability(Countability::CountablyInfinite);
    // {n, n+1, ..., n + (n mod 4) - 1}
    let subsets = LazySequence::from_producer((0u64..).map(|n| (n..n + n % 4).collect::<Vec<_>>()))
        .with_countability(Countability::CountablyInfinite);
    let arrows: Vec<PowersetArrow<u64>> = vec![
        Rc::new(|n: &u64| vec![*n]),
        Rc::new(|n: &u64| vec![*n, n + 1]),
        Rc::new(|_: &u64| Vec::new()),
        Rc::new(|n: &u64| vec![n * 2, n % 3]),
    ];
    PowersetRelativeMonadWitness::new(base, subsets, LazySequence::from_finite(arrows), |n| {
        n.to_string()
    })
}

/// Residues mod 7 moving around a four-node graph.
///
/// ```text
///   0 --(+1, +2)--> 1 --(*2)--> 2 --(id)--> 0
///                   |
///                   +--(id)--> 3
/// ```
///
/// Node 3 is outside the restricting family, so everything routed there is
/// discarded.
pub fn describe_reachability_kan_witness() -> KanExtensionWitness<u8, i64> {
    let arrows = vec![
        SymbolicArrow::finite(0u8, 1u8, |x: &i64| vec![(x + 1) % 7, (x + 2) % 7]),
        SymbolicArrow::finite(1u8, 2u8, |x: &i64| vec![(x * 2) % 7]),
        SymbolicArrow::finite(2u8, 0u8, |x: &i64| vec![*x]),
        SymbolicArrow::finite(1u8, 3u8, |x: &i64| vec![*x]),
    ];
    let family = create_finite_indexed_family(vec![0u8, 1, 2], |_| (0i64..7).collect());
    KanExtensionWitness::new(vec![(0, 0)], arrows, |index, element| format!("{index}:{element}"))
        .restricted_to(family)
}
