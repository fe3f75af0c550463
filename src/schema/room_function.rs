use serde::{Deserialize, Serialize};

use super::affinity::Affinity;
use super::biome::Biome;
use super::error::{require_text, require_weight, ContentError};

fn default_weight() -> f64 {
    1.0
}

/// Optional semantic overlay describing what a room is used for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomFunction {
    /// Substituted for `{Function}` in room names, e.g. "Pumping Station".
    pub name: String,
    /// Substituted for `{Function}` in descriptions.
    pub detail_sentence: String,
    #[serde(default)]
    pub affinity: Affinity,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl RoomFunction {
    pub fn new(name: impl Into<String>, detail_sentence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail_sentence: detail_sentence.into(),
            affinity: Affinity::Universal,
            weight: default_weight(),
        }
    }

    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Universal functions fit every biome.
    pub fn has_affinity_for(&self, biome: Biome) -> bool {
        self.affinity.matches(biome)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        let what = format!("function '{}'", self.name);
        require_text(&what, "name", &self.name)?;
        require_text(&what, "detail_sentence", &self.detail_sentence)?;
        require_weight(&what, self.weight)?;
        if self.affinity.is_empty_listing() {
            return Err(ContentError::EmptyAffinity { what });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universal_by_default() {
        let f: RoomFunction = ron::from_str(
            r#"(
                name: "Guard Post",
                detail_sentence: "A rack of dented spears leans by the door.",
            )"#,
        )
        .unwrap();
        assert!(f.affinity.is_universal());
        assert_eq!(f.weight, 1.0);
        assert!(Biome::all().iter().all(|b| f.has_affinity_for(*b)));
        assert!(f.validate().is_ok());
    }

    #[test]
    fn affinity_restricts() {
        let forge = RoomFunction::new("Forge", "An anvil squats beside a roaring hearth.")
            .with_affinity(Affinity::only(&[Biome::Muspelheim]));
        assert!(forge.has_affinity_for(Biome::Muspelheim));
        assert!(!forge.has_affinity_for(Biome::Niflheim));
    }

    #[test]
    fn invalid_functions() {
        assert!(RoomFunction::new("", "Something.").validate().is_err());
        assert!(RoomFunction::new("Forge", "Hot.")
            .with_weight(-1.0)
            .validate()
            .is_err());
        assert!(RoomFunction::new("Forge", "Hot.")
            .with_affinity(Affinity::Only(Vec::new()))
            .validate()
            .is_err());
    }
}
