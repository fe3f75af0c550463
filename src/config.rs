//! Engine configuration with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::error::ContentError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Top-level configuration for building a descriptor repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DescriptorConfig {
    /// Where content comes from.
    pub content: ContentConfig,
    /// Soft limits authored content is expected to respect.
    pub conventions: ConventionLimits,
}

/// Content sources, merged in order: built-in catalog first, then each
/// directory in the order listed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    /// Load the catalog compiled into the library.
    pub include_builtin: bool,
    /// Directories of `.ron` catalog files layered over the built-in set.
    pub directories: Vec<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            directories: Vec::new(),
        }
    }
}

/// Upper bounds that content respects "by convention".
///
/// A breach is logged as a warning unless `enforce` is set, in which case
/// it is a content error like any other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConventionLimits {
    pub max_hp_multiplier: f64,
    pub max_scale_multiplier: f64,
    pub max_exits: u32,
    pub max_spawn_budget: f64,
    pub enforce: bool,
}

impl Default for ConventionLimits {
    fn default() -> Self {
        Self {
            max_hp_multiplier: 3.0,
            max_scale_multiplier: 5.0,
            max_exits: 6,
            max_spawn_budget: 5.0,
            enforce: false,
        }
    }
}

impl ConventionLimits {
    /// Check `value` against `limit` for the named field of `what`.
    pub(crate) fn check(
        &self,
        what: &str,
        field: &'static str,
        value: f64,
        limit: f64,
    ) -> Result<(), ContentError> {
        if value <= limit {
            return Ok(());
        }
        if self.enforce {
            return Err(ContentError::ConventionExceeded {
                what: what.to_string(),
                field,
                value,
                limit,
            });
        }
        log::warn!("{what}: {field} {value} exceeds the conventional limit of {limit}");
        Ok(())
    }
}

impl DescriptorConfig {
    /// Load a configuration from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<DescriptorConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a configuration from a RON string. Missing fields take defaults.
    pub fn parse_ron(input: &str) -> Result<DescriptorConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }
}
