//! Brute-force law checks for the finite vector relative monad.
//!
//! Over a finite semiring R, the functor `n ↦ Rⁿ` is a monad relative to the
//! inclusion of finite sets: the unit at `n` is the canonical basis, and an
//! arrow `a -> b` (an `a`-indexed family of `b`-vectors) extends to a map
//! `Rᵃ -> Rᵇ` by linear combination. The laws are checked exhaustively over
//! every vector and every arrow between the sampled dimensions.
//!
//! Associativity over triples is the dominant cost, `O(|arrows|² · |vectors|)`
//! per triple, which is why the witnesses keep dimension lists to `≤ 3`.

use crate::config::EnumerationLimits;
use crate::error::{Axiom, AxiomTally, Result};
use crate::linear::{
    Arrow, EnumerationCache, Vector, arrows_equal, canonical_basis_vector,
    canonical_extend_vector, checked_dimension, compose_arrows, identity_arrow, vectors_equal,
};
use crate::report::{Findings, Report};
use crate::semiring::FiniteSemiring;
use serde::{Deserialize, Serialize};

/// A finite semiring and the dimensions to sweep.
///
/// Dimensions are signed so that malformed caller data can be reported
/// rather than rejected by the type system.
#[derive(Debug, Clone)]
pub struct FiniteVectorWitness<S> {
    pub semiring: S,
    pub dimensions: Vec<i64>,
    pub limits: EnumerationLimits,
}

impl<S: FiniteSemiring> FiniteVectorWitness<S> {
    pub fn new(semiring: S, dimensions: Vec<i64>) -> Self {
        Self {
            semiring,
            dimensions,
            limits: EnumerationLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: EnumerationLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Candidate action of an arrow on vectors: `(domain, codomain, arrow, vector)`.
pub type ArrowAction<R> = Box<dyn Fn(usize, usize, &Arrow<R>, &Vector<R>) -> Result<Vector<R>>>;

/// A witness claiming that `arrow_action` is the extension operator.
pub struct FiniteVectorArrowCorrespondenceWitness<S: FiniteSemiring> {
    pub base: FiniteVectorWitness<S>,
    pub arrow_action: ArrowAction<S::Element>,
}

impl<S: FiniteSemiring + Clone + 'static> FiniteVectorArrowCorrespondenceWitness<S> {
    /// The witness whose action is [`canonical_extend_vector`] itself.
    pub fn canonical(base: FiniteVectorWitness<S>) -> Self {
        let semiring = base.semiring.clone();
        Self {
            base,
            arrow_action: Box::new(move |domain, codomain, arrow, vector| {
                canonical_extend_vector(&semiring, domain, codomain, arrow, vector)
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiniteVectorRelativeMonadReport {
    pub holds: bool,
    pub issues: Vec<String>,
    pub details: Vec<String>,
    pub truncated: bool,
    pub semiring: String,
    pub dimensions: Vec<usize>,
    pub checks: AxiomTally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiniteVectorKleisliSplittingReport {
    pub holds: bool,
    pub issues: Vec<String>,
    pub details: Vec<String>,
    pub truncated: bool,
    pub semiring: String,
    pub dimensions: Vec<usize>,
    pub checks: AxiomTally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiniteVectorArrowCorrespondenceReport {
    pub holds: bool,
    pub issues: Vec<String>,
    pub details: Vec<String>,
    pub truncated: bool,
    pub semiring: String,
    pub dimensions: Vec<usize>,
    pub checks: AxiomTally,
}

macro_rules! impl_report {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Report for $ty {
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
        )*
    };
}

impl_report!(
    FiniteVectorRelativeMonadReport,
    FiniteVectorKleisliSplittingReport,
    FiniteVectorArrowCorrespondenceReport,
);

/// Validate the dimension list; negative entries are reported and dropped.
fn resolve_dimensions(dimensions: &[i64], findings: &mut Findings) -> Vec<usize> {
    let mut resolved = Vec::with_capacity(dimensions.len());
    for &d in dimensions {
        match checked_dimension(d) {
            Ok(d) => resolved.push(d),
            Err(err) => findings.configuration("dimension list", &err),
        }
    }
    resolved
}

fn isolate(findings: &mut Findings, context: impl FnOnce() -> String, outcome: Result<()>) {
    if let Err(err) = outcome {
        findings.configuration(&context(), &err);
    }
}

// ============================================================================
// Relative monad laws
// ============================================================================

/// Unit, extension/basis compatibility, and associativity, exhaustively.
pub fn analyze_finite_vector_relative_monad<S: FiniteSemiring>(
    witness: &FiniteVectorWitness<S>,
) -> FiniteVectorRelativeMonadReport {
    tracing::debug!(
        semiring = %witness.semiring.name(),
        dimensions = ?witness.dimensions,
        "analyzing finite vector relative monad"
    );
    let mut findings = Findings::new();
    let dims = resolve_dimensions(&witness.dimensions, &mut findings);
    let mut cache = EnumerationCache::new(&witness.semiring, witness.limits.clone());

    for &d in &dims {
        let outcome = check_unit_law(&mut cache, d, &mut findings);
        isolate(&mut findings, || format!("unit law at dimension {d}"), outcome);
    }

    for &a in &dims {
        for &b in &dims {
            let outcome = check_basis_compatibility(&mut cache, a, b, &mut findings);
            isolate(&mut findings, || format!("extension/basis compatibility for {a}->{b}"), outcome);
        }
    }

    for &a in &dims {
        for &b in &dims {
            for &c in &dims {
                let outcome = check_extension_associativity(&mut cache, a, b, c, &mut findings);
                isolate(&mut findings, || format!("associativity for {a}->{b}->{c}"), outcome);
            }
        }
    }

    let (vector_sets, arrow_sets, hits) = cache.stats();
    findings.detail(format!(
        "enumerated {vector_sets} vector sets and {arrow_sets} arrow sets ({hits} cache hits)"
    ));
    findings.summarize();

    FiniteVectorRelativeMonadReport {
        holds: findings.holds(),
        issues: findings.issues,
        details: findings.details,
        truncated: findings.truncated,
        semiring: witness.semiring.name(),
        dimensions: dims,
        checks: findings.checks,
    }
}

/// `extend(unit, v) == v` for every vector; stops at the first counterexample.
fn check_unit_law<S: FiniteSemiring>(
    cache: &mut EnumerationCache<'_, S>,
    d: usize,
    findings: &mut Findings,
) -> Result<()> {
    let s = cache.semiring();
    let vectors = cache.vectors(d)?;
    let unit = identity_arrow(s, d);
    for v in vectors.iter() {
        findings.checked(Axiom::Unit);
        let extended = canonical_extend_vector(s, d, d, &unit, v)?;
        if !vectors_equal(s, &extended, v) {
            findings.issue(
                Axiom::Unit,
                format!("unit law fails at dimension {d}: extend(unit, {v:?}) = {extended:?}"),
            );
            break;
        }
    }
    Ok(())
}

/// Extending the `i`-th basis vector through `f` gives back column `i`.
fn check_basis_compatibility<S: FiniteSemiring>(
    cache: &mut EnumerationCache<'_, S>,
    a: usize,
    b: usize,
    findings: &mut Findings,
) -> Result<()> {
    let s = cache.semiring();
    let arrows = cache.arrows(a, b)?;
    let basis = (0..a)
        .map(|i| canonical_basis_vector(s, a, i))
        .collect::<Result<Vec<_>>>()?;
    for f in arrows.iter() {
        for (i, e) in basis.iter().enumerate() {
            findings.checked(Axiom::BasisCompatibility);
            let extended = canonical_extend_vector(s, a, b, f, e)?;
            if !vectors_equal(s, &extended, &f[i]) {
                findings.issue(
                    Axiom::BasisCompatibility,
                    format!(
                        "extension/basis compatibility fails for {a}->{b}: arrow {f:?} sends basis {i} to {extended:?}"
                    ),
                );
                return Ok(());
            }
        }
    }
    Ok(())
}

/// `extend(g, extend(f, v)) == extend(g ∘ f, v)` for every `f`, `g`, `v`.
fn check_extension_associativity<S: FiniteSemiring>(
    cache: &mut EnumerationCache<'_, S>,
    a: usize,
    b: usize,
    c: usize,
    findings: &mut Findings,
) -> Result<()> {
    let s = cache.semiring();
    let fs = cache.arrows(a, b)?;
    let gs = cache.arrows(b, c)?;
    let vectors = cache.vectors(a)?;

    for f in fs.iter() {
        let staged_f = vectors
            .iter()
            .map(|v| canonical_extend_vector(s, a, b, f, v))
            .collect::<Result<Vec<_>>>()?;
        for g in gs.iter() {
            let gf = compose_arrows(s, a, b, c, f, g)?;
            for (v, fv) in vectors.iter().zip(&staged_f) {
                findings.checked(Axiom::Associativity);
                let staged = canonical_extend_vector(s, b, c, g, fv)?;
                let direct = canonical_extend_vector(s, a, c, &gf, v)?;
                if !vectors_equal(s, &staged, &direct) {
                    findings.issue(
                        Axiom::Associativity,
                        format!(
                            "associativity fails for {a}->{b}->{c}: f = {f:?}, g = {g:?}, v = {v:?}: {staged:?} != {direct:?}"
                        ),
                    );
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Kleisli splitting
// ============================================================================

/// Identity and associativity of Kleisli composition, by direct comparison.
pub fn analyze_finite_vector_kleisli_splitting<S: FiniteSemiring>(
    witness: &FiniteVectorWitness<S>,
) -> FiniteVectorKleisliSplittingReport {
    tracing::debug!(
        semiring = %witness.semiring.name(),
        dimensions = ?witness.dimensions,
        "analyzing finite vector kleisli splitting"
    );
    let mut findings = Findings::new();
    let dims = resolve_dimensions(&witness.dimensions, &mut findings);
    let mut cache = EnumerationCache::new(&witness.semiring, witness.limits.clone());

    for &a in &dims {
        for &b in &dims {
            let outcome = check_identities(&mut cache, a, b, &mut findings);
            isolate(&mut findings, || format!("identity laws for {a}->{b}"), outcome);
        }
    }

    for &a in &dims {
        for &b in &dims {
            for &c in &dims {
                for &d in &dims {
                    let outcome =
                        check_composition_associativity(&mut cache, [a, b, c, d], &mut findings);
                    isolate(
                        &mut findings,
                        || format!("composition associativity for {a}->{b}->{c}->{d}"),
                        outcome,
                    );
                }
            }
        }
    }

    findings.summarize();

    FiniteVectorKleisliSplittingReport {
        holds: findings.holds(),
        issues: findings.issues,
        details: findings.details,
        truncated: findings.truncated,
        semiring: witness.semiring.name(),
        dimensions: dims,
        checks: findings.checks,
    }
}

/// `id_b ∘ f == f` and `f ∘ id_a == f` for every `f: a -> b`.
fn check_identities<S: FiniteSemiring>(
    cache: &mut EnumerationCache<'_, S>,
    a: usize,
    b: usize,
    findings: &mut Findings,
) -> Result<()> {
    let s = cache.semiring();
    let arrows = cache.arrows(a, b)?;
    let id_a = identity_arrow(s, a);
    let id_b = identity_arrow(s, b);
    let mut left_failed = false;
    let mut right_failed = false;

    for f in arrows.iter() {
        if !left_failed {
            findings.checked(Axiom::LeftIdentity);
            let left = compose_arrows(s, a, b, b, f, &id_b)?;
            if !arrows_equal(s, &left, f) {
                findings.issue(
                    Axiom::LeftIdentity,
                    format!("left identity fails for {a}->{b}: id ∘ {f:?} = {left:?}"),
                );
                left_failed = true;
            }
        }
        if !right_failed {
            findings.checked(Axiom::RightIdentity);
            let right = compose_arrows(s, a, a, b, &id_a, f)?;
            if !arrows_equal(s, &right, f) {
                findings.issue(
                    Axiom::RightIdentity,
                    format!("right identity fails for {a}->{b}: {f:?} ∘ id = {right:?}"),
                );
                right_failed = true;
            }
        }
        if left_failed && right_failed {
            break;
        }
    }
    Ok(())
}

/// `h ∘ (g ∘ f) == (h ∘ g) ∘ f`, and the triple extension agrees with the
/// composite, for every `f: a -> b`, `g: b -> c`, `h: c -> d`.
fn check_composition_associativity<S: FiniteSemiring>(
    cache: &mut EnumerationCache<'_, S>,
    [a, b, c, d]: [usize; 4],
    findings: &mut Findings,
) -> Result<()> {
    let s = cache.semiring();
    let fs = cache.arrows(a, b)?;
    let gs = cache.arrows(b, c)?;
    let hs = cache.arrows(c, d)?;
    let vectors = cache.vectors(a)?;

    // (h ∘ g) for every pair, indexed [g][h].
    let hg_table = gs
        .iter()
        .map(|g| {
            hs.iter()
                .map(|h| compose_arrows(s, b, c, d, g, h))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    for f in fs.iter() {
        for (g, hg_row) in gs.iter().zip(&hg_table) {
            let gf = compose_arrows(s, a, b, c, f, g)?;
            for (h, hg) in hs.iter().zip(hg_row) {
                findings.checked(Axiom::Associativity);
                let left = compose_arrows(s, a, c, d, &gf, h)?;
                let right = compose_arrows(s, a, b, d, f, hg)?;
                if !arrows_equal(s, &left, &right) {
                    findings.issue(
                        Axiom::Associativity,
                        format!(
                            "composition associativity fails for {a}->{b}->{c}->{d}: f = {f:?}, g = {g:?}, h = {h:?}"
                        ),
                    );
                    return Ok(());
                }
                for v in vectors.iter() {
                    let staged = canonical_extend_vector(
                        s,
                        c,
                        d,
                        h,
                        &canonical_extend_vector(
                            s,
                            b,
                            c,
                            g,
                            &canonical_extend_vector(s, a, b, f, v)?,
                        )?,
                    )?;
                    let direct = canonical_extend_vector(s, a, d, &right, v)?;
                    if !vectors_equal(s, &staged, &direct) {
                        findings.issue(
                            Axiom::Associativity,
                            format!(
                                "triple extension disagrees with composite for {a}->{b}->{c}->{d} at v = {v:?}: {staged:?} != {direct:?}"
                            ),
                        );
                        return Ok(());
                    }
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Arrow correspondence
// ============================================================================

/// The witness's arrow action must be the extension operator, and must
/// recover each arrow from its values on the basis.
pub fn analyze_finite_vector_arrow_correspondence<S: FiniteSemiring>(
    witness: &FiniteVectorArrowCorrespondenceWitness<S>,
) -> FiniteVectorArrowCorrespondenceReport {
    let base = &witness.base;
    tracing::debug!(
        semiring = %base.semiring.name(),
        dimensions = ?base.dimensions,
        "analyzing finite vector arrow correspondence"
    );
    let mut findings = Findings::new();
    let dims = resolve_dimensions(&base.dimensions, &mut findings);
    let mut cache = EnumerationCache::new(&base.semiring, base.limits.clone());

    for &a in &dims {
        for &b in &dims {
            let outcome =
                check_arrow_correspondence(&mut cache, &witness.arrow_action, a, b, &mut findings);
            isolate(&mut findings, || format!("arrow correspondence for {a}->{b}"), outcome);
        }
    }

    findings.summarize();

    FiniteVectorArrowCorrespondenceReport {
        holds: findings.holds(),
        issues: findings.issues,
        details: findings.details,
        truncated: findings.truncated,
        semiring: base.semiring.name(),
        dimensions: dims,
        checks: findings.checks,
    }
}

fn check_arrow_correspondence<S: FiniteSemiring>(
    cache: &mut EnumerationCache<'_, S>,
    action: &ArrowAction<S::Element>,
    a: usize,
    b: usize,
    findings: &mut Findings,
) -> Result<()> {
    let s = cache.semiring();
    let arrows = cache.arrows(a, b)?;
    let vectors = cache.vectors(a)?;
    let basis = (0..a)
        .map(|i| canonical_basis_vector(s, a, i))
        .collect::<Result<Vec<_>>>()?;

    for f in arrows.iter() {
        for v in vectors.iter() {
            findings.checked(Axiom::ArrowCorrespondence);
            let acted = action(a, b, f, v)?;
            let expected = canonical_extend_vector(s, a, b, f, v)?;
            if !vectors_equal(s, &acted, &expected) {
                findings.issue(
                    Axiom::ArrowCorrespondence,
                    format!(
                        "arrow correspondence mismatch for {a}->{b}: arrow {f:?} acts on {v:?} as {acted:?}, expected {expected:?}"
                    ),
                );
                return Ok(());
            }
        }
        for (i, e) in basis.iter().enumerate() {
            findings.checked(Axiom::ArrowCorrespondence);
            let column = action(a, b, f, e)?;
            if !vectors_equal(s, &column, &f[i]) {
                findings.issue(
                    Axiom::ArrowCorrespondence,
                    format!(
                        "arrow correspondence mismatch for {a}->{b}: basis {i} recovers {column:?}, arrow column is {:?}",
                        f[i]
                    ),
                );
                return Ok(());
            }
        }
    }
    Ok(())
}
