//! Typed mechanical-effect tags and their string form.
//!
//! Gameplay systems receive tags as strings (`HpMod:0.7`, `Scale:2.0`,
//! `DamageAura:fire:2`, `Brittle`) and can parse them back with `FromStr`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Boolean traits a modifier can impose on a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModifierFlag {
    Brittle,
    Slippery,
    LightSource,
    Dazzle,
}

impl ModifierFlag {
    /// Canonical order, also the order flags appear in effect tags.
    pub const ALL: [ModifierFlag; 4] = [
        ModifierFlag::Brittle,
        ModifierFlag::Slippery,
        ModifierFlag::LightSource,
        ModifierFlag::Dazzle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModifierFlag::Brittle => "Brittle",
            ModifierFlag::Slippery => "Slippery",
            ModifierFlag::LightSource => "LightSource",
            ModifierFlag::Dazzle => "Dazzle",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectTag {
    HpMod(f64),
    Scale(f64),
    DamageAura { damage_type: String, amount: u32 },
    Flag(ModifierFlag),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed effect tag '{0}'")]
pub struct EffectTagParseError(pub String);

/// Multipliers always carry at least one decimal place.
fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for EffectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectTag::HpMod(x) => write!(f, "HpMod:{}", format_multiplier(*x)),
            EffectTag::Scale(x) => write!(f, "Scale:{}", format_multiplier(*x)),
            EffectTag::DamageAura {
                damage_type,
                amount,
            } => write!(f, "DamageAura:{damage_type}:{amount}"),
            EffectTag::Flag(flag) => f.write_str(flag.name()),
        }
    }
}

impl FromStr for EffectTag {
    type Err = EffectTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EffectTagParseError(s.to_string());
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["HpMod", x] => x.parse().map(EffectTag::HpMod).map_err(|_| malformed()),
            ["Scale", x] => x.parse().map(EffectTag::Scale).map_err(|_| malformed()),
            ["DamageAura", damage_type, amount] if !damage_type.is_empty() => {
                let amount = amount.parse().map_err(|_| malformed())?;
                Ok(EffectTag::DamageAura {
                    damage_type: damage_type.to_string(),
                    amount,
                })
            }
            [name] => ModifierFlag::ALL
                .iter()
                .find(|flag| flag.name() == *name)
                .map(|flag| EffectTag::Flag(*flag))
                .ok_or_else(malformed),
            _ => Err(malformed()),
        }
    }
}
