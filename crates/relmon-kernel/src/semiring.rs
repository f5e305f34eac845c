//! Semirings for finite linear algebra.
//!
//! A semiring (R, +, ·, 0, 1) provides:
//! - Additive monoid (R, +, 0)
//! - Multiplicative monoid (R, ·, 1)
//! - Multiplication distributes over addition
//! - 0 annihilates
//!
//! The axioms are assumed, never re-verified by the engine. A
//! [`FiniteSemiring`] additionally lists its carrier so that vectors and
//! matrices over it can be enumerated exhaustively.

use std::fmt::Debug;
use std::hash::Hash;

/// Semiring operations on an instance-carried element type.
///
/// Operations take `&self` so that parameterized semirings such as
/// [`ModularSemiring`] can carry their parameters.
pub trait Semiring {
    type Element: Clone + Debug + PartialEq + Eq + Hash + serde::Serialize;

    fn zero(&self) -> Self::Element;

    fn one(&self) -> Self::Element;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Semiring equality. Defaults to structural equality.
    fn equal(&self, a: &Self::Element, b: &Self::Element) -> bool {
        a == b
    }

    /// Short human-readable name for diagnostics.
    fn name(&self) -> String;
}

/// A semiring with an explicit finite carrier.
pub trait FiniteSemiring: Semiring {
    /// Every element, in enumeration order.
    fn elements(&self) -> &[Self::Element];
}

// ============================================================================
// Boolean semiring
// ============================================================================

/// ({false, true}, OR, AND, false, true).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanSemiring {
    elements: [bool; 2],
}

impl BooleanSemiring {
    pub fn new() -> Self {
        Self {
            elements: [false, true],
        }
    }
}

impl Default for BooleanSemiring {
    fn default() -> Self {
        Self::new()
    }
}

impl Semiring for BooleanSemiring {
    type Element = bool;

    #[inline]
    fn zero(&self) -> bool {
        false
    }

    #[inline]
    fn one(&self) -> bool {
        true
    }

    #[inline]
    fn add(&self, a: &bool, b: &bool) -> bool {
        *a || *b
    }

    #[inline]
    fn mul(&self, a: &bool, b: &bool) -> bool {
        *a && *b
    }

    fn name(&self) -> String {
        "bool(or,and)".to_string()
    }
}

impl FiniteSemiring for BooleanSemiring {
    fn elements(&self) -> &[bool] {
        &self.elements
    }
}

// ============================================================================
// Integers modulo n
// ============================================================================

/// ℤ/nℤ with ordinary addition and multiplication. `n = 0` is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModularSemiring {
    modulus: u64,
    elements: Vec<u64>,
}

impl ModularSemiring {
    /// `None` for a zero modulus.
    pub fn new(modulus: u64) -> Option<Self> {
        if modulus == 0 {
            return None;
        }
        Some(Self {
            modulus,
            elements: (0..modulus).collect(),
        })
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}

impl Semiring for ModularSemiring {
    type Element = u64;

    fn zero(&self) -> u64 {
        0
    }

    fn one(&self) -> u64 {
        1 % self.modulus
    }

    fn add(&self, a: &u64, b: &u64) -> u64 {
        ((*a as u128 + *b as u128) % self.modulus as u128) as u64
    }

    fn mul(&self, a: &u64, b: &u64) -> u64 {
        ((*a as u128 * *b as u128) % self.modulus as u128) as u64
    }

    fn name(&self) -> String {
        format!("z/{}", self.modulus)
    }
}

impl FiniteSemiring for ModularSemiring {
    fn elements(&self) -> &[u64] {
        &self.elements
    }
}

// ============================================================================
// Empty carrier
// ============================================================================

/// A "finite semiring" whose element list is empty.
///
/// Not a real semiring; it exists so that the empty-carrier configuration
/// error can be exercised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyCarrier;

impl Semiring for EmptyCarrier {
    type Element = bool;

    fn zero(&self) -> bool {
        false
    }

    fn one(&self) -> bool {
        true
    }

    fn add(&self, a: &bool, b: &bool) -> bool {
        *a || *b
    }

    fn mul(&self, a: &bool, b: &bool) -> bool {
        *a && *b
    }

    fn name(&self) -> String {
        "empty".to_string()
    }
}

impl FiniteSemiring for EmptyCarrier {
    fn elements(&self) -> &[bool] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_operations() {
        let s = BooleanSemiring::new();
        assert!(s.add(&true, &false));
        assert!(!s.mul(&true, &false));
        assert_eq!(s.elements(), &[false, true]);
        assert!(s.equal(&s.zero(), &false));
    }

    #[test]
    fn modular_operations_wrap() {
        let s = ModularSemiring::new(3).unwrap();
        assert_eq!(s.add(&2, &2), 1);
        assert_eq!(s.mul(&2, &2), 1);
        assert_eq!(s.elements(), &[0, 1, 2]);
        assert_eq!(s.name(), "z/3");
    }

    #[test]
    fn trivial_modulus_collapses_one_to_zero() {
        let s = ModularSemiring::new(1).unwrap();
        assert_eq!(s.one(), s.zero());
        assert!(ModularSemiring::new(0).is_none());
    }
}
