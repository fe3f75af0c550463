use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Thematic zone a room belongs to. Drives modifier selection and
/// fragment filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    TheRoots,
    Muspelheim,
    Niflheim,
    Alfheim,
    Jotunheim,
    Citadel,
    Surface,
}

impl Biome {
    /// The biome whose modifier is used when a biome has none of its own.
    pub const DEFAULT: Biome = Biome::Citadel;

    pub fn all() -> &'static [Biome] {
        &[
            Biome::TheRoots,
            Biome::Muspelheim,
            Biome::Niflheim,
            Biome::Alfheim,
            Biome::Jotunheim,
            Biome::Citadel,
            Biome::Surface,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::TheRoots => "TheRoots",
            Biome::Muspelheim => "Muspelheim",
            Biome::Niflheim => "Niflheim",
            Biome::Alfheim => "Alfheim",
            Biome::Jotunheim => "Jotunheim",
            Biome::Citadel => "Citadel",
            Biome::Surface => "Surface",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Biome {
    type Err = UnknownVariant;

    /// Case-insensitive; also accepts `roots` for `TheRoots`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        if lowered == "roots" {
            return Ok(Biome::TheRoots);
        }
        Biome::all()
            .iter()
            .copied()
            .find(|b| b.name().to_ascii_lowercase() == lowered)
            .ok_or_else(|| UnknownVariant::new("biome", s))
    }
}

/// Structural room category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomArchetype {
    Corridor,
    Chamber,
    Junction,
    DeadEnd,
    Stairwell,
    BossArena,
}

impl RoomArchetype {
    pub fn all() -> &'static [RoomArchetype] {
        &[
            RoomArchetype::Corridor,
            RoomArchetype::Chamber,
            RoomArchetype::Junction,
            RoomArchetype::DeadEnd,
            RoomArchetype::Stairwell,
            RoomArchetype::BossArena,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoomArchetype::Corridor => "Corridor",
            RoomArchetype::Chamber => "Chamber",
            RoomArchetype::Junction => "Junction",
            RoomArchetype::DeadEnd => "DeadEnd",
            RoomArchetype::Stairwell => "Stairwell",
            RoomArchetype::BossArena => "BossArena",
        }
    }
}

impl fmt::Display for RoomArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoomArchetype {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        RoomArchetype::all()
            .iter()
            .copied()
            .find(|a| a.name().to_ascii_lowercase() == lowered)
            .ok_or_else(|| UnknownVariant::new("archetype", s))
    }
}

/// Nominal footprint of a template's room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoomSize {
    Small,
    #[default]
    Medium,
    Large,
    Huge,
}

/// Returned when a biome or archetype name does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
