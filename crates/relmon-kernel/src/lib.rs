//! # Relmon Kernel
//!
//! A finite approximation and enumeration engine for checking relative
//! monad, Kan extension and Kleisli laws by program.
//!
//! Potentially infinite structures are reduced to bounded computations:
//! sequences are sliced, searches are capped, hom-sets are enumerated only
//! below a blow-up guard. Nothing here decides a law for an infinite
//! structure. A report either holds exhaustively within its bounds, holds on
//! a truncated sample, or carries the counterexamples it found.
//!
//! ## Architecture
//!
//! ```text
//! LazySequence<T>        ← Replayable, append-only cached enumeration
//!     │
//! IndexedFamily<I, E>    ← Lazy index sequence + fibre per index
//!     │
//! KanExtensionWitness    ← Seeds + symbolic arrows, bounded BFS
//!
//! Semiring / linear      ← Vectors Rⁿ, column-major arrows, extension
//!     │
//! vector_monad           ← Unit, basis, associativity, Kleisli, correspondence
//!     │
//! quotient + UnionFind   ← Left Kan extension as a union-find quotient
//! ```
//!
//! Every analysis returns a [`Report`]; truncation propagates into its
//! [`Verdict`].

pub mod config;
pub mod digest;
pub mod error;
pub mod family;
pub mod kan;
pub mod lazy;
pub mod linear;
pub mod powerset;
pub mod quotient;
pub mod report;
pub mod semiring;
pub mod union_find;
pub mod vector_monad;
pub mod witnesses;

pub use config::{EngineConfig, EnumerationLimits, KanConfig, PowersetConfig, SliceConfig};
pub use error::{Axiom, AxiomTally, RelmonError, Result};
pub use family::{
    IndexedFamily, MaterializeOptions, MaterializedFamily, create_finite_indexed_family,
    materialize_indexed_family,
};
pub use kan::{
    KanApproximationOptions, KanExtensionApproximation, KanExtensionWitness, KanFrontier,
    SymbolicArrow, approximate_kan_extension,
};
pub use lazy::{
    Countability, CountabilityWitness, LazySequence, SliceOptions, SliceResult,
    slice_lazy_iterable,
};
pub use linear::{Arrow, EnumerationCache, Vector, canonical_extend_vector, compose_arrows};
pub use powerset::{
    PowersetArrow, PowersetProbeOptions, PowersetRelativeMonadReport,
    PowersetRelativeMonadWitness, analyze_powerset_relative_monad,
};
pub use quotient::{
    FiniteVectorLeftKanExtensionReport, FiniteVectorLeftKanExtensionWitness,
    LeftKanTargetSummary, analyze_finite_vector_left_kan_extension,
};
pub use report::{Report, Verdict};
pub use semiring::{BooleanSemiring, FiniteSemiring, ModularSemiring, Semiring};
pub use union_find::UnionFind;
pub use vector_monad::{
    FiniteVectorArrowCorrespondenceReport, FiniteVectorArrowCorrespondenceWitness,
    FiniteVectorKleisliSplittingReport, FiniteVectorRelativeMonadReport, FiniteVectorWitness,
    analyze_finite_vector_arrow_correspondence, analyze_finite_vector_kleisli_splitting,
    analyze_finite_vector_relative_monad,
};
