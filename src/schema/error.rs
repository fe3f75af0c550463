//! Content-integrity errors. Any of these makes a catalog unusable.

use thiserror::Error;

use super::biome::Biome;
use super::fragment::FragmentCategory;
use crate::core::token::Token;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    #[error("{what}: {field} is empty")]
    EmptyText { what: String, field: &'static str },
    #[error("{what}: {field} contains a reserved brace character")]
    ReservedCharacter { what: String, field: &'static str },
    #[error("{what}: weight must be positive, got {weight}")]
    NonPositiveWeight { what: String, weight: f64 },
    #[error("{what}: {field} must be positive, got {value}")]
    NonPositiveMultiplier {
        what: String,
        field: &'static str,
        value: f64,
    },
    #[error("{what}: {field} {value} exceeds the conventional limit of {limit}")]
    ConventionExceeded {
        what: String,
        field: &'static str,
        value: f64,
        limit: f64,
    },
    #[error("{what}: biome affinity lists no biomes")]
    EmptyAffinity { what: String },
    #[error("{what}: unknown {category:?} subcategory '{subcategory}'")]
    UnknownSubcategory {
        what: String,
        category: FragmentCategory,
        subcategory: String,
    },
    #[error("no fragments in category {0:?}")]
    EmptyCategory(FragmentCategory),
    #[error("no {category:?} fragment is reachable from biome {biome}")]
    UncoveredBiome {
        category: FragmentCategory,
        biome: Biome,
    },
    #[error("template '{template}': {field} is missing required token {token}")]
    MissingToken {
        template: String,
        field: &'static str,
        token: Token,
    },
    #[error("template '{template}': token {token} is not allowed in room names")]
    TokenNotAllowed { template: String, token: Token },
    #[error("template '{template}': room names must begin with \"The \"")]
    NameMissingArticle { template: String },
    #[error("template '{template}': invalid exit range {min}..={max}")]
    InvalidExits { template: String, min: u32, max: u32 },
    #[error("duplicate template id '{0}'")]
    DuplicateTemplate(String),
    #[error("modifier '{0}': damage aura needs a positive amount and a damage type without ':'")]
    InvalidDamageAura(String),
    #[error("more than one modifier for biome {0}")]
    DuplicateModifier(Biome),
    #[error("no default modifier for biome {}", Biome::DEFAULT)]
    MissingDefaultModifier,
    #[error("catalog has no base templates")]
    NoTemplates,
}

/// Short, single-line label for a piece of text, used in error messages.
pub(crate) fn excerpt(text: &str) -> String {
    const MAX_CHARS: usize = 30;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    }
}

/// Fails when `value` is blank.
pub(crate) fn require_text(
    what: &str,
    field: &'static str,
    value: &str,
) -> Result<(), ContentError> {
    if value.trim().is_empty() {
        return Err(ContentError::EmptyText {
            what: what.to_string(),
            field,
        });
    }
    if value.contains(['{', '}']) {
        return Err(ContentError::ReservedCharacter {
            what: what.to_string(),
            field,
        });
    }
    Ok(())
}

/// Fails unless `weight` is a finite number above zero.
pub(crate) fn require_weight(what: &str, weight: f64) -> Result<(), ContentError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(ContentError::NonPositiveWeight {
            what: what.to_string(),
            weight,
        })
    }
}
