//! Sampled law probe for powerset-style relative monads.
//!
//! The unit sends `x` to `{x}` and an arrow `f: T -> P(T)` extends to subsets
//! by union of images. Base, subset and arrow collections are lazy and may be
//! infinite, so each is sliced first; the laws are then checked on the
//! sample and the report is marked truncated whenever any slice was.

use crate::config::PowersetConfig;
use crate::error::{Axiom, AxiomTally};
use crate::lazy::{LazySequence, SliceOptions, slice_lazy_iterable};
use crate::report::{Findings, Report};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

pub type PowersetArrow<T> = Rc<dyn Fn(&T) -> Vec<T>>;

/// Symbolic powerset witness. `key` decides element identity for set equality.
pub struct PowersetRelativeMonadWitness<T> {
    pub base: LazySequence<T>,
    pub subsets: LazySequence<Vec<T>>,
    pub arrows: LazySequence<PowersetArrow<T>>,
    key: Box<dyn Fn(&T) -> String>,
}

impl<T: Clone> PowersetRelativeMonadWitness<T> {
    pub fn new(
        base: LazySequence<T>,
        subsets: LazySequence<Vec<T>>,
        arrows: LazySequence<PowersetArrow<T>>,
        key: impl Fn(&T) -> String + 'static,
    ) -> Self {
        Self {
            base,
            subsets,
            arrows,
            key: Box::new(key),
        }
    }

    /// Sorted, deduplicated keys: the set a list denotes.
    fn set_of(&self, items: &[T]) -> Vec<String> {
        let mut keys: Vec<String> = items.iter().map(|item| (self.key)(item)).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowersetProbeOptions {
    pub base_limit: usize,
    pub subset_limit: usize,
    pub arrow_limit: usize,
}

impl Default for PowersetProbeOptions {
    fn default() -> Self {
        Self::from(&PowersetConfig::default())
    }
}

impl From<&PowersetConfig> for PowersetProbeOptions {
    fn from(config: &PowersetConfig) -> Self {
        Self {
            base_limit: config.base_limit,
            subset_limit: config.subset_limit,
            arrow_limit: config.arrow_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowersetRelativeMonadReport {
    pub holds: bool,
    pub issues: Vec<String>,
    pub details: Vec<String>,
    pub truncated: bool,
    pub base_sampled: usize,
    pub subsets_sampled: usize,
    pub arrows_sampled: usize,
    pub checks: AxiomTally,
}

impl Report for PowersetRelativeMonadReport {
    fn holds(&self) -> bool {
        self.holds
    }

    fn issues(&self) -> &[String] {
        &self.issues
    }

    fn truncated(&self) -> bool {
        self.truncated
    }
}

fn extend<T: Clone>(arrow: &PowersetArrow<T>, subset: &[T]) -> Vec<T> {
    subset.iter().flat_map(|x| arrow(x)).collect()
}

pub fn analyze_powerset_relative_monad<T: Clone + 'static>(
    witness: &PowersetRelativeMonadWitness<T>,
    options: PowersetProbeOptions,
) -> PowersetRelativeMonadReport {
    let base = slice_lazy_iterable(&witness.base, SliceOptions::limit(options.base_limit));
    let subsets = slice_lazy_iterable(&witness.subsets, SliceOptions::limit(options.subset_limit));
    let arrows = slice_lazy_iterable(&witness.arrows, SliceOptions::limit(options.arrow_limit));
    tracing::debug!(
        base = base.len(),
        subsets = subsets.len(),
        arrows = arrows.len(),
        "probing powerset relative monad"
    );

    let mut findings = Findings::new();
    for (label, truncated) in [
        ("base", base.truncated),
        ("subsets", subsets.truncated),
        ("arrows", arrows.truncated),
    ] {
        if truncated {
            findings.truncated = true;
            findings.detail(format!("{label} sample truncated"));
        }
    }

    let unit: PowersetArrow<T> = Rc::new(|x: &T| vec![x.clone()]);

    for subset in &subsets.values {
        findings.checked(Axiom::LeftIdentity);
        let expected = witness.set_of(subset);
        let actual = witness.set_of(&extend(&unit, subset));
        if actual != expected {
            findings.issue(
                Axiom::LeftIdentity,
                format!("left unit fails: extend(unit, {expected:?}) = {actual:?}"),
            );
        }
    }

    for (i, f) in arrows.values.iter().enumerate() {
        for x in &base.values {
            findings.checked(Axiom::RightIdentity);
            let direct = witness.set_of(&f(x));
            let extended = witness.set_of(&extend(f, std::slice::from_ref(x)));
            if direct != extended {
                findings.issue(
                    Axiom::RightIdentity,
                    format!(
                        "right unit fails for arrow #{i} at {:?}: {extended:?} != {direct:?}",
                        witness.set_of(std::slice::from_ref(x))
                    ),
                );
            }
        }
    }

    for (i, f) in arrows.values.iter().enumerate() {
        for (j, g) in arrows.values.iter().enumerate() {
            let g_after_f: PowersetArrow<T> = {
                let f = f.clone();
                let g = g.clone();
                Rc::new(move |x: &T| extend(&g, &f(x)))
            };
            for subset in &subsets.values {
                findings.checked(Axiom::Associativity);
                let staged = witness.set_of(&extend(g, &extend(f, subset)));
                let direct = witness.set_of(&extend(&g_after_f, subset));
                if staged != direct {
                    findings.issue(
                        Axiom::Associativity,
                        format!(
                            "associativity fails for arrows #{i}, #{j} on {:?}: {staged:?} != {direct:?}",
                            witness.set_of(subset)
                        ),
                    );
                }
            }
        }
    }

    findings.summarize();
    if findings.truncated && findings.holds() {
        tracing::warn!("powerset laws hold on the sample only");
    }

    PowersetRelativeMonadReport {
        holds: findings.holds(),
        issues: findings.issues,
        details: findings.details,
        truncated: findings.truncated,
        base_sampled: base.len(),
        subsets_sampled: subsets.len(),
        arrows_sampled: arrows.len(),
        checks: findings.checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrows(list: Vec<PowersetArrow<u32>>) -> LazySequence<PowersetArrow<u32>> {
        LazySequence::from_finite(list)
    }

    fn arrow(f: impl Fn(&u32) -> Vec<u32> + 'static) -> PowersetArrow<u32> {
        Rc::new(f)
    }

    #[test]
    fn finite_witness_holds_exhaustively() {
        let witness = PowersetRelativeMonadWitness::new(
            LazySequence::from_finite(vec![0u32, 1, 2]),
            LazySequence::from_finite(vec![vec![], vec![0], vec![1, 2, 1]]),
            arrows(vec![arrow(|x| vec![*x, x + 1]), arrow(|_| vec![])]),
            |x| x.to_string(),
        );
        let report = analyze_powerset_relative_monad(&witness, PowersetProbeOptions::default());
        assert!(report.holds, "issues: {:?}", report.issues);
        assert!(!report.truncated);
        assert_eq!(report.checks.count(Axiom::Associativity), 2 * 2 * 3);
        assert_eq!(report.checks.count(Axiom::RightIdentity), 2 * 3);
    }

    #[test]
    fn duplicates_do_not_break_set_equality() {
        let witness = PowersetRelativeMonadWitness::new(
            LazySequence::from_finite(vec![1u32]),
            LazySequence::from_finite(vec![vec![1, 1, 1]]),
            arrows(vec![arrow(|x| vec![*x, *x])]),
            |x| x.to_string(),
        );
        let report = analyze_powerset_relative_monad(&witness, PowersetProbeOptions::default());
        assert!(report.holds);
    }

    #[test]
    fn collapsing_key_is_respected() {
        // Everything compares equal under a constant key.
        let witness = PowersetRelativeMonadWitness::new(
            LazySequence::from_finite(vec![1u32, 2]),
            LazySequence::from_finite(vec![vec![1, 2]]),
            arrows(vec![arrow(|x| vec![x * 10])]),
            |_| "*".to_string(),
        );
        let report = analyze_powerset_relative_monad(&witness, PowersetProbeOptions::default());
        assert!(report.holds);
    }

    #[test]
    fn infinite_base_marks_truncation() {
        let witness = PowersetRelativeMonadWitness::new(
            LazySequence::from_producer(0u32..),
            LazySequence::from_finite(vec![vec![3]]),
            arrows(vec![arrow(|x| vec![*x])]),
            |x| x.to_string(),
        );
        let report = analyze_powerset_relative_monad(
            &witness,
            PowersetProbeOptions {
                base_limit: 4,
                subset_limit: 4,
                arrow_limit: 4,
            },
        );
        assert!(report.holds);
        assert!(report.truncated);
        assert_eq!(report.base_sampled, 4);
        assert_eq!(report.details[0], "base sample truncated");
    }
}
