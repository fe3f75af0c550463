use serde::{Deserialize, Serialize};

use super::biome::Biome;
use super::effect::{EffectTag, ModifierFlag};
use super::error::{require_text, ContentError};
use crate::config::ConventionLimits;

fn default_multiplier() -> f64 {
    1.0
}

/// Damage dealt each turn to anything in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageAura {
    pub per_turn: u32,
    pub damage_type: String,
}

/// Per-biome bundle of flavor text and mechanical effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeModifier {
    pub biome: Biome,
    /// Substituted for `{Modifier}`, e.g. "Frozen".
    pub name: String,
    /// Substituted for `{Modifier_Adj}`, e.g. "ice-covered".
    pub adjective: String,
    /// Verb phrase substituted for `{Modifier_Detail}`, e.g. "is encased in frost".
    pub detail_fragment: String,
    #[serde(default = "default_multiplier")]
    pub hp_multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub scale_multiplier: f64,
    #[serde(default)]
    pub damage_aura: Option<DamageAura>,
    #[serde(default)]
    pub flags: Vec<ModifierFlag>,
}

impl BiomeModifier {
    pub fn has_flag(&self, flag: ModifierFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn damage_per_turn(&self) -> u32 {
        self.damage_aura.as_ref().map_or(0, |aura| aura.per_turn)
    }

    pub fn damage_type(&self) -> Option<&str> {
        self.damage_aura.as_ref().map(|aura| aura.damage_type.as_str())
    }

    /// Mechanical effects in canonical order: HP, scale, damage aura, then
    /// flags in [`ModifierFlag::ALL`] order.
    pub fn effects(&self) -> Vec<EffectTag> {
        let mut effects = Vec::new();
        if self.hp_multiplier != 1.0 {
            effects.push(EffectTag::HpMod(self.hp_multiplier));
        }
        if self.scale_multiplier != 1.0 {
            effects.push(EffectTag::Scale(self.scale_multiplier));
        }
        if let Some(aura) = &self.damage_aura {
            effects.push(EffectTag::DamageAura {
                damage_type: aura.damage_type.clone(),
                amount: aura.per_turn,
            });
        }
        effects.extend(
            ModifierFlag::ALL
                .iter()
                .filter(|flag| self.has_flag(**flag))
                .map(|flag| EffectTag::Flag(*flag)),
        );
        effects
    }

    /// The string form of [`effects`](Self::effects).
    pub fn effect_tags(&self) -> Vec<String> {
        self.effects().iter().map(ToString::to_string).collect()
    }

    pub fn validate(&self, limits: &ConventionLimits) -> Result<(), ContentError> {
        let what = format!("modifier '{}'", self.name);
        require_text(&what, "name", &self.name)?;
        require_text(&what, "adjective", &self.adjective)?;
        require_text(&what, "detail_fragment", &self.detail_fragment)?;

        for (field, value, limit) in [
            ("hp_multiplier", self.hp_multiplier, limits.max_hp_multiplier),
            ("scale_multiplier", self.scale_multiplier, limits.max_scale_multiplier),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ContentError::NonPositiveMultiplier {
                    what: what.clone(),
                    field,
                    value,
                });
            }
            limits.check(&what, field, value, limit)?;
        }

        if let Some(aura) = &self.damage_aura {
            let damage_type = aura.damage_type.trim();
            // ':' separates the fields of the DamageAura effect tag.
            if aura.per_turn == 0 || damage_type.is_empty() || damage_type.contains(':') {
                return Err(ContentError::InvalidDamageAura(self.name.clone()));
            }
        }
        Ok(())
    }
}
