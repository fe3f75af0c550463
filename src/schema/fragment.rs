use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::affinity::Affinity;
use super::biome::Biome;
use super::error::{excerpt, require_text, require_weight, ContentError};

/// The slot family a fragment fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FragmentCategory {
    Spatial,
    Architectural,
    Detail,
    Atmospheric,
    Direction,
}

impl FragmentCategory {
    pub fn all() -> &'static [FragmentCategory] {
        &[
            FragmentCategory::Spatial,
            FragmentCategory::Architectural,
            FragmentCategory::Detail,
            FragmentCategory::Atmospheric,
            FragmentCategory::Direction,
        ]
    }

    /// Subcategories content may use within this category.
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            FragmentCategory::Spatial | FragmentCategory::Direction => &[],
            FragmentCategory::Architectural => &["Wall", "Ceiling", "Floor"],
            FragmentCategory::Detail => &["Decay", "Runes", "Activity", "Ominous", "Loot"],
            FragmentCategory::Atmospheric => &["Smell", "Sound", "Light", "Temperature"],
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// An atomic, independently authored piece of description text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub category: FragmentCategory,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub affinity: Affinity,
    /// Free-form content tags such as `Cramped` or `Vast`.
    #[serde(default)]
    pub tags: FxHashSet<String>,
}

impl Fragment {
    pub fn new(text: impl Into<String>, category: FragmentCategory) -> Self {
        Self {
            text: text.into(),
            category,
            subcategory: None,
            weight: default_weight(),
            affinity: Affinity::Universal,
            tags: FxHashSet::default(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn matches_biome(&self, biome: Biome) -> bool {
        self.affinity.matches(biome)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    fn label(&self) -> String {
        format!("{:?} fragment '{}'", self.category, excerpt(&self.text))
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        let what = self.label();
        require_text(&what, "text", &self.text)?;
        require_weight(&what, self.weight)?;
        if self.affinity.is_empty_listing() {
            return Err(ContentError::EmptyAffinity { what });
        }
        if let Some(sub) = &self.subcategory {
            if !self.category.subcategories().contains(&sub.as_str()) {
                return Err(ContentError::UnknownSubcategory {
                    what,
                    category: self.category,
                    subcategory: sub.clone(),
                });
            }
        }
        Ok(())
    }
}
