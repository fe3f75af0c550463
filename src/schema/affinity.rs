use serde::{Deserialize, Serialize};

use super::biome::Biome;

/// Which biomes a piece of content may appear in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affinity {
    /// Available everywhere.
    #[default]
    Universal,
    /// Restricted to the listed biomes. Must not be empty.
    Only(Vec<Biome>),
}

impl Affinity {
    pub fn only(biomes: &[Biome]) -> Affinity {
        Affinity::Only(biomes.to_vec())
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Affinity::Universal)
    }

    /// Universal content matches every biome.
    pub fn matches(&self, biome: Biome) -> bool {
        match self {
            Affinity::Universal => true,
            Affinity::Only(biomes) => biomes.contains(&biome),
        }
    }

    /// True only for an explicit listing of `biome`, not for universal content.
    pub fn names(&self, biome: Biome) -> bool {
        matches!(self, Affinity::Only(biomes) if biomes.contains(&biome))
    }

    pub(crate) fn is_empty_listing(&self) -> bool {
        matches!(self, Affinity::Only(biomes) if biomes.is_empty())
    }
}
