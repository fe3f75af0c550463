//! Catalog documents: the serialized form of descriptor content.
//!
//! A catalog is a RON document with up to four sections, each optional:
//!
//! ```text
//! (
//!     fragments: [ (text: "...", category: Spatial), ... ],
//!     modifiers: [ (biome: Niflheim, name: "Frozen", ...), ... ],
//!     templates: [ (id: "chamber_hall", archetype: Chamber, ...), ... ],
//!     functions: [ (name: "Forge", detail_sentence: "...", ...), ... ],
//! )
//! ```
//!
//! Catalogs are layered with [`DescriptorCatalog::merge`] and checked as a
//! whole with [`DescriptorCatalog::validate`] before a repository is built.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ConventionLimits;
use crate::core::repository::RepositoryError;
use crate::schema::biome::Biome;
use crate::schema::error::ContentError;
use crate::schema::fragment::{Fragment, FragmentCategory};
use crate::schema::modifier::BiomeModifier;
use crate::schema::room_function::RoomFunction;
use crate::schema::template::BaseTemplate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorCatalog {
    pub fragments: Vec<Fragment>,
    pub modifiers: Vec<BiomeModifier>,
    pub templates: Vec<BaseTemplate>,
    pub functions: Vec<RoomFunction>,
}

impl DescriptorCatalog {
    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<DescriptorCatalog, RepositoryError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::parse_ron(&contents)?;
        log::debug!(
            "loaded {}: {} fragments, {} modifiers, {} templates, {} functions",
            path.display(),
            catalog.fragments.len(),
            catalog.modifiers.len(),
            catalog.templates.len(),
            catalog.functions.len()
        );
        Ok(catalog)
    }

    /// Parse a catalog from a RON string.
    pub fn parse_ron(input: &str) -> Result<DescriptorCatalog, RepositoryError> {
        Ok(ron::from_str(input)?)
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
            && self.modifiers.is_empty()
            && self.templates.is_empty()
            && self.functions.is_empty()
    }

    /// Layer `other` over this catalog. A modifier replaces an existing one
    /// for the same biome; everything else is appended in order.
    pub fn merge(&mut self, other: DescriptorCatalog) {
        let prior = self.modifiers.len();
        let mut replaced = 0;
        for modifier in other.modifiers {
            match self.modifiers[..prior]
                .iter()
                .position(|m| m.biome == modifier.biome)
            {
                Some(pos) => {
                    self.modifiers[pos] = modifier;
                    replaced += 1;
                }
                None => self.modifiers.push(modifier),
            }
        }
        log::debug!(
            "merged catalog: +{} fragments, {} modifiers replaced, +{} templates, +{} functions",
            other.fragments.len(),
            replaced,
            other.templates.len(),
            other.functions.len()
        );
        self.fragments.extend(other.fragments);
        self.templates.extend(other.templates);
        self.functions.extend(other.functions);
    }

    /// Check every entry and the catalog-wide guarantees composition relies
    /// on: each category reachable from each biome, one modifier per biome,
    /// a default modifier, at least one template, unique template ids.
    pub fn validate(&self, limits: &ConventionLimits) -> Result<(), ContentError> {
        for fragment in &self.fragments {
            fragment.validate()?;
        }
        for modifier in &self.modifiers {
            modifier.validate(limits)?;
        }
        for template in &self.templates {
            template.validate(limits)?;
        }
        for function in &self.functions {
            function.validate()?;
        }

        for category in FragmentCategory::all() {
            let pool: Vec<&Fragment> = self
                .fragments
                .iter()
                .filter(|f| f.category == *category)
                .collect();
            if pool.is_empty() {
                return Err(ContentError::EmptyCategory(*category));
            }
            for biome in Biome::all() {
                if !pool.iter().any(|f| f.matches_biome(*biome)) {
                    return Err(ContentError::UncoveredBiome {
                        category: *category,
                        biome: *biome,
                    });
                }
            }
        }

        let mut seen_biomes = FxHashSet::default();
        for modifier in &self.modifiers {
            if !seen_biomes.insert(modifier.biome) {
                return Err(ContentError::DuplicateModifier(modifier.biome));
            }
        }
        if !seen_biomes.contains(&Biome::DEFAULT) {
            return Err(ContentError::MissingDefaultModifier);
        }

        if self.templates.is_empty() {
            return Err(ContentError::NoTemplates);
        }
        let mut seen_ids = FxHashSet::default();
        for template in &self.templates {
            if !seen_ids.insert(template.id.as_str()) {
                return Err(ContentError::DuplicateTemplate(template.id.clone()));
            }
        }
        Ok(())
    }
}
