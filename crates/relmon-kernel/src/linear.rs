//! Exhaustive finite linear algebra over a semiring.
//!
//! Vectors are fixed-length sequences of semiring elements. An arrow
//! `domain -> codomain` is a matrix in column-major form: one codomain
//! vector per domain basis index. Extending a vector through an arrow is
//! matrix-vector application, and Kleisli composition of arrows is
//! column-wise extension.
//!
//! Everything here is enumerated exhaustively, so sizes explode quickly:
//! `|R|^d` vectors and `|R|^(d*c)` arrows. [`EnumerationCache`] memoizes the
//! sets for one analysis and refuses hom-sets beyond the configured guard.

use crate::config::EnumerationLimits;
use crate::error::{RelmonError, Result};
use crate::semiring::{FiniteSemiring, Semiring};
use std::collections::HashMap;
use std::rc::Rc;

pub type Vector<R> = Vec<R>;

/// Column-major matrix: `arrow[i]` is the image of the `i`-th basis vector.
pub type Arrow<R> = Vec<Vector<R>>;

/// Reject negative dimensions coming from caller-supplied witness data.
pub fn checked_dimension(dimension: i64) -> Result<usize> {
    usize::try_from(dimension).map_err(|_| RelmonError::NegativeDimension(dimension))
}

/// `|elements|^dimension`, saturating at `usize::MAX`.
pub fn count_vectors<S: FiniteSemiring>(semiring: &S, dimension: usize) -> usize {
    saturating_pow(semiring.elements().len(), dimension)
}

/// `count_vectors(codomain)^domain`, saturating at `usize::MAX`.
pub fn count_arrows<S: FiniteSemiring>(semiring: &S, domain: usize, codomain: usize) -> usize {
    saturating_pow(count_vectors(semiring, codomain), domain)
}

fn saturating_pow(base: usize, exponent: usize) -> usize {
    let exponent = u32::try_from(exponent).unwrap_or(u32::MAX);
    base.saturating_pow(exponent)
}

/// Cartesian power of `items`, first coordinate varying slowest.
pub(crate) fn cartesian_power<T: Clone>(items: &[T], length: usize) -> Vec<Vec<T>> {
    let mut out: Vec<Vec<T>> = vec![Vec::with_capacity(length)];
    for _ in 0..length {
        let mut next = Vec::with_capacity(out.len() * items.len());
        for prefix in &out {
            for item in items {
                let mut extended = prefix.clone();
                extended.push(item.clone());
                next.push(extended);
            }
        }
        out = next;
    }
    out
}

/// All vectors of the given dimension. Dimension 0 has exactly one, `[]`.
pub fn enumerate_vectors<S: FiniteSemiring>(
    semiring: &S,
    dimension: usize,
) -> Result<Vec<Vector<S::Element>>> {
    if dimension > 0 && semiring.elements().is_empty() {
        return Err(RelmonError::EmptySemiring { dimension });
    }
    Ok(cartesian_power(semiring.elements(), dimension))
}

/// All arrows `domain -> codomain`: every choice of one codomain vector
/// per domain column.
pub fn enumerate_arrows<S: FiniteSemiring>(
    semiring: &S,
    domain: usize,
    codomain: usize,
) -> Result<Vec<Arrow<S::Element>>> {
    let columns = enumerate_vectors(semiring, codomain)?;
    Ok(cartesian_power(&columns, domain))
}

/// `one` at position `index`, `zero` elsewhere.
pub fn canonical_basis_vector<S: Semiring>(
    semiring: &S,
    dimension: usize,
    index: usize,
) -> Result<Vector<S::Element>> {
    if index >= dimension {
        return Err(RelmonError::BasisIndexOutOfRange { index, dimension });
    }
    Ok((0..dimension)
        .map(|i| {
            if i == index {
                semiring.one()
            } else {
                semiring.zero()
            }
        })
        .collect())
}

/// The unit arrow `dimension -> dimension`: the canonical basis family.
pub fn identity_arrow<S: Semiring>(semiring: &S, dimension: usize) -> Arrow<S::Element> {
    (0..dimension)
        .map(|column| {
            (0..dimension)
                .map(|row| {
                    if row == column {
                        semiring.one()
                    } else {
                        semiring.zero()
                    }
                })
                .collect()
        })
        .collect()
}

/// The arrow induced by a finite function `domain -> codomain`: column `i`
/// is the basis vector at `mapping[i]`.
pub fn function_arrow<S: Semiring>(
    semiring: &S,
    codomain: usize,
    mapping: &[usize],
) -> Result<Arrow<S::Element>> {
    mapping
        .iter()
        .map(|&target| canonical_basis_vector(semiring, codomain, target))
        .collect()
}

/// `Σ_i vector[i] · arrow[i]`: extend `vector` through `arrow`.
pub fn canonical_extend_vector<S: Semiring>(
    semiring: &S,
    domain: usize,
    codomain: usize,
    arrow: &Arrow<S::Element>,
    vector: &Vector<S::Element>,
) -> Result<Vector<S::Element>> {
    if arrow.len() != domain {
        return Err(RelmonError::DimensionMismatch {
            context: "arrow column count",
            expected: domain,
            actual: arrow.len(),
        });
    }
    if vector.len() != domain {
        return Err(RelmonError::DimensionMismatch {
            context: "vector length",
            expected: domain,
            actual: vector.len(),
        });
    }
    if let Some(column) = arrow.iter().find(|column| column.len() != codomain) {
        return Err(RelmonError::DimensionMismatch {
            context: "arrow column length",
            expected: codomain,
            actual: column.len(),
        });
    }

    let mut result = vec![semiring.zero(); codomain];
    for (coefficient, column) in vector.iter().zip(arrow) {
        for (acc, entry) in result.iter_mut().zip(column) {
            *acc = semiring.add(acc, &semiring.mul(coefficient, entry));
        }
    }
    Ok(result)
}

/// Kleisli composition `g ∘ f` for `f: a -> b`, `g: b -> c`.
pub fn compose_arrows<S: Semiring>(
    semiring: &S,
    a: usize,
    b: usize,
    c: usize,
    f: &Arrow<S::Element>,
    g: &Arrow<S::Element>,
) -> Result<Arrow<S::Element>> {
    if f.len() != a {
        return Err(RelmonError::DimensionMismatch {
            context: "composed arrow column count",
            expected: a,
            actual: f.len(),
        });
    }
    f.iter()
        .map(|column| canonical_extend_vector(semiring, b, c, g, column))
        .collect()
}

/// Elementwise semiring equality; vectors of different lengths differ.
pub fn vectors_equal<S: Semiring>(
    semiring: &S,
    left: &Vector<S::Element>,
    right: &Vector<S::Element>,
) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(l, r)| semiring.equal(l, r))
}

pub fn arrows_equal<S: Semiring>(
    semiring: &S,
    left: &Arrow<S::Element>,
    right: &Arrow<S::Element>,
) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| vectors_equal(semiring, l, r))
}

/// Memoized vector and arrow sets for one analysis call.
///
/// Never shared across analyses. Sets are handed out as `Rc` slices so the
/// nested sweeps can hold several at once.
pub struct EnumerationCache<'a, S: FiniteSemiring> {
    semiring: &'a S,
    limits: EnumerationLimits,
    vectors: HashMap<usize, Rc<[Vector<S::Element>]>>,
    arrows: HashMap<(usize, usize), Rc<[Arrow<S::Element>]>>,
    hits: usize,
}

impl<'a, S: FiniteSemiring> EnumerationCache<'a, S> {
    pub fn new(semiring: &'a S, limits: EnumerationLimits) -> Self {
        Self {
            semiring,
            limits,
            vectors: HashMap::new(),
            arrows: HashMap::new(),
            hits: 0,
        }
    }

    pub fn semiring(&self) -> &'a S {
        self.semiring
    }

    pub fn vectors(&mut self, dimension: usize) -> Result<Rc<[Vector<S::Element>]>> {
        if let Some(cached) = self.vectors.get(&dimension) {
            self.hits += 1;
            return Ok(cached.clone());
        }
        let size = count_vectors(self.semiring, dimension);
        if size > self.limits.max_vectors_per_dimension {
            return Err(RelmonError::EnumerationTooLarge {
                what: format!("vectors of dimension {dimension}"),
                size,
                limit: self.limits.max_vectors_per_dimension,
            });
        }
        let set: Rc<[Vector<S::Element>]> = enumerate_vectors(self.semiring, dimension)?.into();
        self.vectors.insert(dimension, set.clone());
        Ok(set)
    }

    pub fn arrows(&mut self, domain: usize, codomain: usize) -> Result<Rc<[Arrow<S::Element>]>> {
        if let Some(cached) = self.arrows.get(&(domain, codomain)) {
            self.hits += 1;
            return Ok(cached.clone());
        }
        let size = count_arrows(self.semiring, domain, codomain);
        if size > self.limits.max_arrows_per_hom {
            return Err(RelmonError::EnumerationTooLarge {
                what: format!("arrows {domain}->{codomain}"),
                size,
                limit: self.limits.max_arrows_per_hom,
            });
        }
        let columns = self.vectors(codomain)?;
        let set: Rc<[Arrow<S::Element>]> = cartesian_power(&columns, domain).into();
        self.arrows.insert((domain, codomain), set.clone());
        Ok(set)
    }

    /// `(vector sets, arrow sets, cache hits)`.
    pub fn stats(&self) -> (usize, usize, usize) {
        (self.vectors.len(), self.arrows.len(), self.hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::{BooleanSemiring, EmptyCarrier, ModularSemiring};

    #[test]
    fn boolean_vector_counts() {
        let s = BooleanSemiring::new();
        for d in 0..5 {
            assert_eq!(enumerate_vectors(&s, d).unwrap().len(), 1 << d);
        }
        assert_eq!(enumerate_vectors(&s, 0).unwrap(), vec![Vec::<bool>::new()]);
    }

    #[test]
    fn empty_carrier_fails_fast() {
        let err = enumerate_vectors(&EmptyCarrier, 2).unwrap_err();
        assert!(matches!(err, RelmonError::EmptySemiring { dimension: 2 }));
        assert_eq!(enumerate_vectors(&EmptyCarrier, 0).unwrap().len(), 1);
    }

    #[test]
    fn arrow_counts() {
        let s = BooleanSemiring::new();
        assert_eq!(enumerate_arrows(&s, 2, 2).unwrap().len(), 16);
        assert_eq!(enumerate_arrows(&s, 0, 3).unwrap(), vec![Vec::<Vec<bool>>::new()]);
        assert_eq!(enumerate_arrows(&s, 3, 0).unwrap(), vec![vec![Vec::<bool>::new(); 3]]);
        assert_eq!(count_arrows(&s, 2, 3), 64);
    }

    #[test]
    fn basis_vector_bounds() {
        let s = BooleanSemiring::new();
        assert_eq!(canonical_basis_vector(&s, 3, 1).unwrap(), vec![false, true, false]);
        let err = canonical_basis_vector(&s, 2, 2).unwrap_err();
        assert!(matches!(
            err,
            RelmonError::BasisIndexOutOfRange {
                index: 2,
                dimension: 2
            }
        ));
    }

    #[test]
    fn extend_is_matrix_application() {
        let s = ModularSemiring::new(5).unwrap();
        // columns: e0 -> [1, 2], e1 -> [3, 4]
        let arrow = vec![vec![1, 2], vec![3, 4]];
        let v = vec![2, 1];
        // 2*[1,2] + 1*[3,4] = [5, 8] = [0, 3] mod 5
        assert_eq!(canonical_extend_vector(&s, 2, 2, &arrow, &v).unwrap(), vec![0, 3]);
    }

    #[test]
    fn extend_rejects_mismatched_shapes() {
        let s = BooleanSemiring::new();
        let arrow = vec![vec![true, false]];
        assert!(matches!(
            canonical_extend_vector(&s, 2, 2, &arrow, &vec![true, true]),
            Err(RelmonError::DimensionMismatch {
                context: "arrow column count",
                ..
            })
        ));
        assert!(matches!(
            canonical_extend_vector(&s, 1, 2, &arrow, &vec![true, true]),
            Err(RelmonError::DimensionMismatch {
                context: "vector length",
                ..
            })
        ));
        assert!(matches!(
            canonical_extend_vector(&s, 1, 3, &arrow, &vec![true]),
            Err(RelmonError::DimensionMismatch {
                context: "arrow column length",
                ..
            })
        ));
    }

    #[test]
    fn unit_arrow_is_identity_up_to_three() {
        let s = BooleanSemiring::new();
        for d in 0..=3 {
            let unit = identity_arrow(&s, d);
            for v in enumerate_vectors(&s, d).unwrap() {
                assert_eq!(canonical_extend_vector(&s, d, d, &unit, &v).unwrap(), v);
            }
        }
    }

    #[test]
    fn composition_matches_sequential_extension() {
        let s = ModularSemiring::new(3).unwrap();
        let f = vec![vec![1, 2]];
        let g = vec![vec![2], vec![1]];
        let gf = compose_arrows(&s, 1, 2, 1, &f, &g).unwrap();
        let v = vec![2];
        let staged = canonical_extend_vector(&s, 2, 1, &g, &canonical_extend_vector(&s, 1, 2, &f, &v).unwrap()).unwrap();
        assert_eq!(canonical_extend_vector(&s, 1, 1, &gf, &v).unwrap(), staged);
    }

    #[test]
    fn function_arrow_places_basis_columns() {
        let s = BooleanSemiring::new();
        let arrow = function_arrow(&s, 2, &[1, 1, 0]).unwrap();
        assert_eq!(arrow, vec![vec![false, true], vec![false, true], vec![true, false]]);
        assert!(function_arrow(&s, 2, &[2]).is_err());
    }

    #[test]
    fn cache_memoizes_and_guards() {
        let s = BooleanSemiring::new();
        let mut cache = EnumerationCache::new(
            &s,
            EnumerationLimits {
                max_vectors_per_dimension: 8,
                max_arrows_per_hom: 16,
            },
        );
        let first = cache.arrows(2, 2).unwrap();
        let second = cache.arrows(2, 2).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), (1, 1, 1));

        let err = cache.arrows(2, 3).unwrap_err();
        assert!(matches!(err, RelmonError::EnumerationTooLarge { size: 64, limit: 16, .. }));
        assert!(cache.vectors(4).is_err());
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        assert_eq!(checked_dimension(3).unwrap(), 3);
        assert!(matches!(
            checked_dimension(-2),
            Err(RelmonError::NegativeDimension(-2))
        ));
    }
}
