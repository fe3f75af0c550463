use serde::{Deserialize, Serialize};

use super::biome::{RoomArchetype, RoomSize};
use super::error::{require_weight, ContentError};
use crate::config::ConventionLimits;
use crate::core::token::{Token, TokenString};

fn default_weight() -> f64 {
    1.0
}

fn default_spawn_budget() -> f64 {
    1.0
}

/// Structural skeleton of a room: its archetype plus name and description
/// token strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseTemplate {
    pub id: String,
    pub archetype: RoomArchetype,
    #[serde(default)]
    pub size: RoomSize,
    pub name: TokenString,
    pub description: TokenString,
    pub min_exits: u32,
    pub max_exits: u32,
    #[serde(default = "default_spawn_budget")]
    pub spawn_budget_multiplier: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl BaseTemplate {
    pub fn validate(&self, limits: &ConventionLimits) -> Result<(), ContentError> {
        let template = self.id.clone();
        if template.trim().is_empty() {
            return Err(ContentError::EmptyText {
                what: format!("{} template", self.archetype),
                field: "id",
            });
        }

        if !self.name.starts_with("The ") {
            return Err(ContentError::NameMissingArticle { template });
        }
        if !self.name.contains(Token::Modifier) {
            return Err(ContentError::MissingToken {
                template,
                field: "name",
                token: Token::Modifier,
            });
        }
        if let Some(token) = self.name.tokens().find(|t| !t.allowed_in_name()) {
            return Err(ContentError::TokenNotAllowed { template, token });
        }
        if !self.description.contains(Token::ModifierAdj) {
            return Err(ContentError::MissingToken {
                template,
                field: "description",
                token: Token::ModifierAdj,
            });
        }

        if self.min_exits < 1 || self.max_exits < self.min_exits {
            return Err(ContentError::InvalidExits {
                template,
                min: self.min_exits,
                max: self.max_exits,
            });
        }

        let what = format!("template '{template}'");
        if !(self.spawn_budget_multiplier.is_finite() && self.spawn_budget_multiplier > 0.0) {
            return Err(ContentError::NonPositiveMultiplier {
                what,
                field: "spawn_budget_multiplier",
                value: self.spawn_budget_multiplier,
            });
        }
        require_weight(&what, self.weight)?;

        limits.check(
            &what,
            "max_exits",
            f64::from(self.max_exits),
            f64::from(limits.max_exits),
        )?;
        limits.check(
            &what,
            "spawn_budget_multiplier",
            self.spawn_budget_multiplier,
            limits.max_spawn_budget,
        )?;
        Ok(())
    }
}
