//! Engine configuration.
//!
//! All limits the engine applies when a caller does not pass one explicitly.
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [slice]
//! default_limit = 32
//!
//! [kan]
//! depth_limit = 4
//! breadth_limit = 64
//! index_limit = 32
//!
//! [enumeration]
//! max_vectors_per_dimension = 4096
//! max_arrows_per_hom = 65536
//!
//! [powerset]
//! base_limit = 8
//! subset_limit = 8
//! arrow_limit = 4
//! ```

use crate::error::{RelmonError, Result};
use crate::lazy::DEFAULT_SLICE_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub slice: SliceConfig,
    pub kan: KanConfig,
    pub enumeration: EnumerationLimits,
    pub powerset: PowersetConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Used when neither an explicit limit nor a finite size is known.
    pub default_limit: usize,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_SLICE_LIMIT,
        }
    }
}

/// Bounds for the Kan extension frontier search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanConfig {
    pub depth_limit: usize,
    pub breadth_limit: usize,
    /// Slice bound for the allowed-index restriction.
    pub index_limit: usize,
}

impl Default for KanConfig {
    fn default() -> Self {
        Self {
            depth_limit: 4,
            breadth_limit: 64,
            index_limit: DEFAULT_SLICE_LIMIT,
        }
    }
}

/// Blow-up guard for exhaustive semiring enumeration.
///
/// A hom-set larger than these limits is skipped with an issue and the
/// report is marked truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationLimits {
    pub max_vectors_per_dimension: usize,
    pub max_arrows_per_hom: usize,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            max_vectors_per_dimension: 4096,
            max_arrows_per_hom: 65536,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowersetConfig {
    pub base_limit: usize,
    pub subset_limit: usize,
    pub arrow_limit: usize,
}

impl Default for PowersetConfig {
    fn default() -> Self {
        Self {
            base_limit: 8,
            subset_limit: 8,
            arrow_limit: 4,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text. Missing sections and keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| RelmonError::ParseConfig { source })
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RelmonError::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
