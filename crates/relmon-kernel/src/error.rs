//! Error types for relmon kernel operations.
//!
//! Only configuration errors are represented here. Law violations are never
//! errors: they become issue strings on a report with `holds = false`.
//! Reaching an approximation bound is not an error either; it is recorded
//! as a `truncated` flag.

/// Malformed input detected at the point of misuse.
#[derive(Debug, thiserror::Error)]
pub enum RelmonError {
    /// A dimension or target size was negative.
    #[error("dimension must be non-negative, got {0}")]
    NegativeDimension(i64),

    /// A basis index outside `[0, dimension)`.
    #[error("basis index {index} out of range for dimension {dimension}")]
    BasisIndexOutOfRange { index: usize, dimension: usize },

    /// Exhaustive enumeration over a finite semiring with no elements.
    #[error("finite semiring has no elements; cannot enumerate dimension {dimension}")]
    EmptySemiring { dimension: usize },

    /// Vector, arrow or column lengths disagree with the declared dimensions.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An enumeration would exceed the configured blow-up guard.
    ///
    /// `size` saturates at `usize::MAX`.
    #[error("enumeration of {what} has {size} members, above the limit of {limit}")]
    EnumerationTooLarge {
        what: String,
        size: usize,
        limit: usize,
    },

    /// Reading a configuration file failed.
    #[error("failed to read config: {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`crate::config::EngineConfig`].
    #[error("invalid config toml: {source}")]
    ParseConfig {
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, RelmonError>;

/// Which law a report issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axiom {
    Unit,
    BasisCompatibility,
    Associativity,
    LeftIdentity,
    RightIdentity,
    ArrowCorrespondence,
    Reachability,
    Identification,
    Configuration,
}

impl std::fmt::Display for Axiom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unit => "unit",
            Self::BasisCompatibility => "basis compatibility",
            Self::Associativity => "associativity",
            Self::LeftIdentity => "left identity",
            Self::RightIdentity => "right identity",
            Self::ArrowCorrespondence => "arrow correspondence",
            Self::Reachability => "reachability",
            Self::Identification => "identification",
            Self::Configuration => "configuration",
        };
        f.write_str(label)
    }
}

/// Per-axiom counter, used both for comparisons performed and issues raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AxiomTally {
    counts: Vec<(Axiom, usize)>,
}

impl AxiomTally {
    pub fn record(&mut self, axiom: Axiom) {
        match self.counts.iter_mut().find(|(a, _)| *a == axiom) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((axiom, 1)),
        }
    }

    pub fn count(&self, axiom: Axiom) -> usize {
        self.counts
            .iter()
            .find(|(a, _)| *a == axiom)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// One `"<axiom>: <count>"` line per axiom, in first-seen order.
    pub fn lines(&self) -> Vec<String> {
        self.counts
            .iter()
            .map(|(axiom, n)| format!("{axiom}: {n}"))
            .collect()
    }
}
