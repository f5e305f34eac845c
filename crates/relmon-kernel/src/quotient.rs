//! Finite left Kan extension of the vector functor along the inclusion of
//! small dimensions, checked as a quotient.
//!
//! For a target size `t`, the colimit presenting `R^t` has one generator
//! `(domain, mapping, vector)` for every finite function `mapping: domain -> t`
//! and every `vector ∈ R^domain`, with `domain` ranging up to the dimension
//! limit. Each naturality square
//!
//! ```text
//!   (source, mapping ∘ comparison, v)  ~  (domain, mapping, comparison_*(v))
//! ```
//!
//! is fed to a [`UnionFind`]. The quotient is correct when every vector of
//! `R^t` is the canonical image of some generator and all generators with the
//! same image end up in one class.

use crate::config::EnumerationLimits;
use crate::error::{Axiom, RelmonError, Result};
use crate::linear::{
    EnumerationCache, Vector, canonical_extend_vector, cartesian_power, checked_dimension,
    function_arrow,
};
use crate::report::{Findings, Report};
use crate::semiring::FiniteSemiring;
use crate::union_find::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// A finite function `domain -> codomain` as its image list.
pub type FiniteFunction = Vec<usize>;

#[derive(Debug, Clone)]
pub struct FiniteVectorLeftKanExtensionWitness<S> {
    pub semiring: S,
    /// Largest domain size used to present the extension (inclusive).
    pub dimension_limit: usize,
    pub target_sizes: Vec<i64>,
    pub limits: EnumerationLimits,
}

impl<S: FiniteSemiring> FiniteVectorLeftKanExtensionWitness<S> {
    pub fn new(semiring: S, dimension_limit: usize, target_sizes: Vec<i64>) -> Self {
        Self {
            semiring,
            dimension_limit,
            target_sizes,
            limits: EnumerationLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: EnumerationLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Per-target statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftKanTargetSummary {
    pub target: usize,
    pub entries: usize,
    pub classes: usize,
    pub target_vectors: usize,
    pub reached: usize,
    pub unions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiniteVectorLeftKanExtensionReport {
    pub holds: bool,
    pub issues: Vec<String>,
    pub details: Vec<String>,
    pub truncated: bool,
    pub semiring: String,
    pub dimension_limit: usize,
    pub targets: Vec<LeftKanTargetSummary>,
}

impl Report for FiniteVectorLeftKanExtensionReport {
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

/// Memoized `domain -> codomain` function sets, guarded like arrows.
struct FunctionCache {
    limit: usize,
    sets: HashMap<(usize, usize), Rc<[FiniteFunction]>>,
}

impl FunctionCache {
    fn new(limits: &EnumerationLimits) -> Self {
        Self {
            limit: limits.max_arrows_per_hom,
            sets: HashMap::new(),
        }
    }

    fn functions(&mut self, domain: usize, codomain: usize) -> Result<Rc<[FiniteFunction]>> {
        if let Some(cached) = self.sets.get(&(domain, codomain)) {
            return Ok(cached.clone());
        }
        let size = codomain.saturating_pow(u32::try_from(domain).unwrap_or(u32::MAX));
        if size > self.limit {
            return Err(RelmonError::EnumerationTooLarge {
                what: format!("functions {domain}->{codomain}"),
                size,
                limit: self.limit,
            });
        }
        let points: Vec<usize> = (0..codomain).collect();
        let set: Rc<[FiniteFunction]> = cartesian_power(&points, domain).into();
        self.sets.insert((domain, codomain), set.clone());
        Ok(set)
    }
}

type EntryKey<R> = (usize, FiniteFunction, Vector<R>);

/// One generator of the colimit and its image in the target.
struct Entry<R> {
    canonical: Vector<R>,
}

pub fn analyze_finite_vector_left_kan_extension<S: FiniteSemiring>(
    witness: &FiniteVectorLeftKanExtensionWitness<S>,
) -> FiniteVectorLeftKanExtensionReport {
    tracing::debug!(
        semiring = %witness.semiring.name(),
        dimension_limit = witness.dimension_limit,
        targets = ?witness.target_sizes,
        "analyzing finite vector left kan extension"
    );
    let mut findings = Findings::new();
    let mut cache = EnumerationCache::new(&witness.semiring, witness.limits.clone());
    let mut functions = FunctionCache::new(&witness.limits);
    let mut targets = Vec::new();

    for &raw in &witness.target_sizes {
        let target = match checked_dimension(raw) {
            Ok(target) => target,
            Err(err) => {
                findings.configuration("target sizes", &err);
                continue;
            }
        };
        match check_target(
            &mut cache,
            &mut functions,
            witness.dimension_limit,
            target,
            &mut findings,
        ) {
            Ok(summary) => {
                findings.detail(format!(
                    "target {target}: {} entries in {} classes, {}/{} vectors reached",
                    summary.entries, summary.classes, summary.reached, summary.target_vectors
                ));
                targets.push(summary);
            }
            Err(err) => {
                findings.configuration(&format!("left kan extension for target {target}"), &err)
            }
        }
    }

    findings.summarize();

    FiniteVectorLeftKanExtensionReport {
        holds: findings.holds(),
        issues: findings.issues,
        details: findings.details,
        truncated: findings.truncated,
        semiring: witness.semiring.name(),
        dimension_limit: witness.dimension_limit,
        targets,
    }
}

fn check_target<S: FiniteSemiring>(
    cache: &mut EnumerationCache<'_, S>,
    functions: &mut FunctionCache,
    dimension_limit: usize,
    target: usize,
    findings: &mut Findings,
) -> Result<LeftKanTargetSummary> {
    let s = cache.semiring();

    let mut entries: Vec<Entry<S::Element>> = Vec::new();
    let mut index: HashMap<EntryKey<S::Element>, usize> = HashMap::new();
    for domain in 0..=dimension_limit {
        let vectors = cache.vectors(domain)?;
        for mapping in functions.functions(domain, target)?.iter() {
            let arrow = function_arrow(s, target, mapping)?;
            for v in vectors.iter() {
                let key = (domain, mapping.clone(), v.clone());
                if index.contains_key(&key) {
                    continue;
                }
                let canonical = canonical_extend_vector(s, domain, target, &arrow, v)?;
                index.insert(key, entries.len());
                entries.push(Entry { canonical });
            }
        }
    }

    let mut classes = UnionFind::new(entries.len());
    let mut unions = 0;
    for source in 0..=dimension_limit {
        let source_vectors = cache.vectors(source)?;
        for domain in 0..=dimension_limit {
            let mappings = functions.functions(domain, target)?;
            for comparison in functions.functions(source, domain)?.iter() {
                let comparison_arrow = function_arrow(s, domain, comparison)?;
                for v in source_vectors.iter() {
                    let pushed = canonical_extend_vector(s, source, domain, &comparison_arrow, v)?;
                    for mapping in mappings.iter() {
                        let composite: FiniteFunction =
                            comparison.iter().map(|&i| mapping[i]).collect();
                        let left = index.get(&(source, composite, v.clone()));
                        let right = index.get(&(domain, mapping.clone(), pushed.clone()));
                        match (left, right) {
                            (Some(&left), Some(&right)) => {
                                if classes.union(left, right) {
                                    unions += 1;
                                }
                            }
                            _ => findings.issue(
                                Axiom::Identification,
                                format!(
                                    "naturality square for {source}->{domain}->{target} has no entry for one side"
                                ),
                            ),
                        }
                    }
                }
            }
        }
    }
    tracing::trace!(target_size = target, entries = entries.len(), unions, "union-find saturated");

    // Group by canonical value, first-seen order.
    let mut group_of: HashMap<&Vector<S::Element>, usize> = HashMap::new();
    let mut groups: Vec<(&Vector<S::Element>, Vec<usize>)> = Vec::new();
    for (id, entry) in entries.iter().enumerate() {
        let slot = *group_of.entry(&entry.canonical).or_insert_with(|| {
            groups.push((&entry.canonical, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(id);
    }

    let target_vectors = cache.vectors(target)?;
    let mut reached = 0;
    for w in target_vectors.iter() {
        findings.checked(Axiom::Reachability);
        if group_of.contains_key(w) {
            reached += 1;
        } else {
            findings.issue(
                Axiom::Reachability,
                format!(
                    "left kan extension failed to reach {w:?} in target {target} with dimension limit {dimension_limit}"
                ),
            );
        }
    }

    for (canonical, members) in &groups {
        findings.checked(Axiom::Identification);
        let mut roots: Vec<usize> = members.iter().map(|&id| classes.find(id)).collect();
        roots.sort_unstable();
        roots.dedup();
        if roots.len() > 1 {
            findings.issue(
                Axiom::Identification,
                format!(
                    "multiple presentations of {canonical:?} in target {target} not identified ({} classes over {} entries)",
                    roots.len(),
                    members.len()
                ),
            );
        }
    }

    Ok(LeftKanTargetSummary {
        target,
        entries: entries.len(),
        classes: classes.class_count(),
        target_vectors: target_vectors.len(),
        reached,
        unions,
    })
}
