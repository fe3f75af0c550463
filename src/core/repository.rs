//! Immutable, indexed store of descriptor content.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ConventionLimits, DescriptorConfig};
use crate::content;
use crate::core::catalog::DescriptorCatalog;
use crate::core::weighted::choose_weighted;
use crate::schema::biome::{Biome, RoomArchetype};
use crate::schema::error::ContentError;
use crate::schema::fragment::{Fragment, FragmentCategory};
use crate::schema::modifier::BiomeModifier;
use crate::schema::room_function::RoomFunction;
use crate::schema::template::BaseTemplate;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid content: {0}")]
    Content(#[from] ContentError),
}

/// Collection sizes and the number of distinct room skeletons the catalog
/// can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub modifiers: usize,
    pub templates: usize,
    pub functions: usize,
    pub fragments: usize,
    pub fragments_by_category: BTreeMap<FragmentCategory, usize>,
    /// templates × modifiers × spatial × architectural × detail × atmospheric.
    pub estimated_combinations: u64,
}

/// Read-only access to templates, modifiers, fragments and functions.
///
/// Built once through [`DescriptorRepository::builder`] (or
/// [`builtin`](DescriptorRepository::builtin)) from content that has passed
/// validation. Share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct DescriptorRepository {
    fragments: Vec<Fragment>,
    modifiers: Vec<BiomeModifier>,
    templates: Vec<BaseTemplate>,
    functions: Vec<RoomFunction>,
    fragments_by_category: FxHashMap<FragmentCategory, Vec<usize>>,
    fragments_by_biome: FxHashMap<(FragmentCategory, Biome), Vec<usize>>,
    modifier_by_biome: FxHashMap<Biome, usize>,
    default_modifier: usize,
    templates_by_archetype: FxHashMap<RoomArchetype, Vec<usize>>,
    functions_by_biome: FxHashMap<Biome, Vec<usize>>,
}

impl DescriptorRepository {
    pub fn builder() -> DescriptorRepositoryBuilder {
        DescriptorRepositoryBuilder {
            include_builtin: false,
            content_dirs: Vec::new(),
            catalogs: Vec::new(),
            conventions: ConventionLimits::default(),
        }
    }

    /// The repository over the catalog compiled into the library.
    pub fn builtin() -> Result<DescriptorRepository, RepositoryError> {
        Self::builder().with_builtin().build()
    }

    pub fn from_config(config: &DescriptorConfig) -> Result<DescriptorRepository, RepositoryError> {
        let mut builder = Self::builder()
            .include_builtin(config.content.include_builtin)
            .conventions(config.conventions.clone());
        for dir in &config.content.directories {
            builder = builder.content_dir(dir);
        }
        builder.build()
    }

    /// Index a validated catalog. Callers go through the builder, which
    /// validates first.
    fn index(catalog: DescriptorCatalog) -> Result<DescriptorRepository, ContentError> {
        let DescriptorCatalog {
            fragments,
            modifiers,
            templates,
            functions,
        } = catalog;

        let mut fragments_by_category: FxHashMap<FragmentCategory, Vec<usize>> =
            FxHashMap::default();
        let mut fragments_by_biome: FxHashMap<(FragmentCategory, Biome), Vec<usize>> =
            FxHashMap::default();
        for (i, fragment) in fragments.iter().enumerate() {
            fragments_by_category.entry(fragment.category).or_default().push(i);
            for biome in Biome::all() {
                if fragment.matches_biome(*biome) {
                    fragments_by_biome
                        .entry((fragment.category, *biome))
                        .or_default()
                        .push(i);
                }
            }
        }

        let modifier_by_biome: FxHashMap<Biome, usize> = modifiers
            .iter()
            .enumerate()
            .map(|(i, m)| (m.biome, i))
            .collect();
        let default_modifier = *modifier_by_biome
            .get(&Biome::DEFAULT)
            .ok_or(ContentError::MissingDefaultModifier)?;

        let mut templates_by_archetype: FxHashMap<RoomArchetype, Vec<usize>> = FxHashMap::default();
        for (i, template) in templates.iter().enumerate() {
            templates_by_archetype.entry(template.archetype).or_default().push(i);
        }

        let mut functions_by_biome: FxHashMap<Biome, Vec<usize>> = FxHashMap::default();
        for (i, function) in functions.iter().enumerate() {
            for biome in Biome::all() {
                if function.has_affinity_for(*biome) {
                    functions_by_biome.entry(*biome).or_default().push(i);
                }
            }
        }

        Ok(DescriptorRepository {
            fragments,
            modifiers,
            templates,
            functions,
            fragments_by_category,
            fragments_by_biome,
            modifier_by_biome,
            default_modifier,
            templates_by_archetype,
            functions_by_biome,
        })
    }

    // --- Modifiers ---

    /// Every modifier, in content order. Never empty.
    pub fn all_modifiers(&self) -> &[BiomeModifier] {
        &self.modifiers
    }

    /// The modifier for `biome`, or the default biome's modifier when the
    /// biome has none of its own.
    pub fn modifier(&self, biome: Biome) -> &BiomeModifier {
        let index = self
            .modifier_by_biome
            .get(&biome)
            .copied()
            .unwrap_or(self.default_modifier);
        &self.modifiers[index]
    }

    // --- Templates ---

    pub fn all_base_templates(&self) -> &[BaseTemplate] {
        &self.templates
    }

    /// Every template of `archetype`, in content order.
    pub fn base_templates_for(&self, archetype: RoomArchetype) -> Vec<&BaseTemplate> {
        self.templates_by_archetype
            .get(&archetype)
            .map(|indices| indices.iter().map(|&i| &self.templates[i]).collect())
            .unwrap_or_default()
    }

    /// The representative template for `archetype`: highest weight, earliest
    /// authored on ties.
    pub fn base_template(&self, archetype: RoomArchetype) -> Option<&BaseTemplate> {
        let mut best: Option<&BaseTemplate> = None;
        for template in self.base_templates_for(archetype) {
            if best.map_or(true, |b| template.weight > b.weight) {
                best = Some(template);
            }
        }
        best
    }

    /// Weighted choice among the templates of `archetype`.
    pub fn choose_base_template<R: Rng + ?Sized>(
        &self,
        archetype: RoomArchetype,
        rng: &mut R,
    ) -> Option<&BaseTemplate> {
        let candidates = self.base_templates_for(archetype);
        let chosen = choose_weighted(&candidates, |t| t.weight, rng).copied();
        if let Some(template) = chosen {
            log::trace!("template for {archetype}: {}", template.id);
        }
        chosen
    }

    pub fn template_by_id(&self, id: &str) -> Option<&BaseTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    // --- Functions ---

    pub fn all_functions(&self) -> &[RoomFunction] {
        &self.functions
    }

    /// Universal functions plus those with an affinity for `biome`.
    pub fn functions_by_biome(&self, biome: Biome) -> Vec<&RoomFunction> {
        self.functions_by_biome
            .get(&biome)
            .map(|indices| indices.iter().map(|&i| &self.functions[i]).collect())
            .unwrap_or_default()
    }

    /// Weighted choice among [`functions_by_biome`](Self::functions_by_biome).
    pub fn choose_function<R: Rng + ?Sized>(
        &self,
        biome: Biome,
        rng: &mut R,
    ) -> Option<&RoomFunction> {
        let candidates = self.functions_by_biome(biome);
        choose_weighted(&candidates, |f| f.weight, rng).copied()
    }

    pub fn function_by_name(&self, name: &str) -> Option<&RoomFunction> {
        self.functions
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    // --- Fragments ---

    /// Fragments of `category` in content order, restricted to those usable
    /// in `biome` when one is given.
    pub fn fragments(&self, category: FragmentCategory, biome: Option<Biome>) -> Vec<&Fragment> {
        let indices = match biome {
            Some(biome) => self.fragments_by_biome.get(&(category, biome)),
            None => self.fragments_by_category.get(&category),
        };
        indices
            .map(|indices| indices.iter().map(|&i| &self.fragments[i]).collect())
            .unwrap_or_default()
    }

    /// [`fragments`](Self::fragments) narrowed to those carrying at least one
    /// of `tags`. An empty tag list applies no tag filter.
    pub fn fragments_tagged(
        &self,
        category: FragmentCategory,
        biome: Option<Biome>,
        tags: &[&str],
    ) -> Vec<&Fragment> {
        let mut fragments = self.fragments(category, biome);
        if !tags.is_empty() {
            fragments.retain(|f| tags.iter().any(|tag| f.has_tag(tag)));
        }
        fragments
    }

    pub fn stats(&self) -> CatalogStats {
        let fragments_by_category: BTreeMap<FragmentCategory, usize> = FragmentCategory::all()
            .iter()
            .map(|c| {
                let count = self.fragments_by_category.get(c).map_or(0, Vec::len);
                (*c, count)
            })
            .collect();
        let combinations = [
            self.templates.len(),
            self.modifiers.len(),
            fragments_by_category[&FragmentCategory::Spatial],
            fragments_by_category[&FragmentCategory::Architectural],
            fragments_by_category[&FragmentCategory::Detail],
            fragments_by_category[&FragmentCategory::Atmospheric],
        ]
        .iter()
        .fold(1u64, |acc, n| acc.saturating_mul(*n as u64));

        CatalogStats {
            modifiers: self.modifiers.len(),
            templates: self.templates.len(),
            functions: self.functions.len(),
            fragments: self.fragments.len(),
            fragments_by_category,
            estimated_combinations: combinations,
        }
    }
}

/// Builder for constructing a `DescriptorRepository`.
///
/// Sources merge in a fixed order: the built-in catalog, then content
/// directories in the order added (files within a directory by name), then
/// in-memory catalogs in the order added.
pub struct DescriptorRepositoryBuilder {
    include_builtin: bool,
    content_dirs: Vec<PathBuf>,
    catalogs: Vec<DescriptorCatalog>,
    conventions: ConventionLimits,
}

impl DescriptorRepositoryBuilder {
    pub fn with_builtin(self) -> Self {
        self.include_builtin(true)
    }

    pub fn include_builtin(mut self, include: bool) -> Self {
        self.include_builtin = include;
        self
    }

    /// Add a directory of `.ron` catalog files.
    pub fn content_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.content_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Add a catalog directly (for tests and embedding without files).
    pub fn with_catalog(mut self, catalog: DescriptorCatalog) -> Self {
        self.catalogs.push(catalog);
        self
    }

    pub fn conventions(mut self, conventions: ConventionLimits) -> Self {
        self.conventions = conventions;
        self
    }

    pub fn build(self) -> Result<DescriptorRepository, RepositoryError> {
        let mut catalog = if self.include_builtin {
            content::builtin_catalog()?
        } else {
            DescriptorCatalog::default()
        };

        for dir in &self.content_dirs {
            if !dir.exists() {
                log::warn!("content directory {} does not exist; skipping", dir.display());
                continue;
            }
            load_ron_files_from_dir(dir, |path| {
                catalog.merge(DescriptorCatalog::load_from_ron(path)?);
                Ok(())
            })?;
        }

        for extra in self.catalogs {
            catalog.merge(extra);
        }

        catalog.validate(&self.conventions)?;
        let repository = DescriptorRepository::index(catalog)?;
        let stats = repository.stats();
        log::info!(
            "descriptor repository ready: {} templates, {} modifiers, {} functions, {} fragments",
            stats.templates,
            stats.modifiers,
            stats.functions,
            stats.fragments
        );
        Ok(repository)
    }
}

/// Run `loader` on every `.ron` file in `dir`, in file-name order.
fn load_ron_files_from_dir<F>(dir: &Path, mut loader: F) -> Result<(), RepositoryError>
where
    F: FnMut(&Path) -> Result<(), RepositoryError>,
{
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            paths.push(path);
        }
    }
    paths.sort();
    for path in &paths {
        loader(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MINIMAL: &str = include_str!("../../tests/fixtures/minimal_catalog.ron");

    fn minimal() -> DescriptorRepository {
        DescriptorRepository::builder()
            .with_catalog(DescriptorCatalog::parse_ron(MINIMAL).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn modifier_lookup_falls_back_to_default() {
        let repo = minimal();
        assert_eq!(repo.modifier(Biome::Niflheim).name, "Frozen");
        assert_eq!(repo.modifier(Biome::Muspelheim).name, "Ancient");
        assert_eq!(repo.modifier(Biome::Surface).biome, Biome::Citadel);
    }

    #[test]
    fn fragment_filter_is_ordered_subset() {
        let repo = minimal();
        let all = repo.fragments(FragmentCategory::Detail, None);
        let citadel = repo.fragments(FragmentCategory::Detail, Some(Biome::Citadel));
        let niflheim = repo.fragments(FragmentCategory::Detail, Some(Biome::Niflheim));
        assert_eq!(all.len(), 3);
        assert_eq!(citadel.len(), 2);
        assert_eq!(niflheim.len(), 3);
        let mut positions = citadel
            .iter()
            .map(|f| all.iter().position(|a| std::ptr::eq(*a, *f)).unwrap());
        let first = positions.next().unwrap();
        assert!(positions.all(|p| p > first));
    }

    #[test]
    fn tagged_fragments_match_any_tag() {
        let repo = minimal();
        let cramped = repo.fragments_tagged(FragmentCategory::Spatial, None, &["Cramped"]);
        assert_eq!(cramped.len(), 1);
        assert!(cramped[0].has_tag("Cramped"));
        assert!(repo
            .fragments_tagged(FragmentCategory::Spatial, Some(Biome::Citadel), &["Vast"])
            .is_empty());
        assert_eq!(
            repo.fragments_tagged(FragmentCategory::Detail, Some(Biome::Niflheim), &[]).len(),
            3
        );
    }

    #[test]
    fn functions_include_universal() {
        let repo = minimal();
        let names = |b| {
            repo.functions_by_biome(b)
                .iter()
                .map(|f| f.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(Biome::Citadel), vec!["Guard Post"]);
        assert_eq!(names(Biome::Niflheim), vec!["Guard Post", "Cold Storage"]);
    }

    #[test]
    fn base_template_prefers_weight_then_order() {
        let mut catalog = DescriptorCatalog::parse_ron(MINIMAL).unwrap();
        let mut heavy = catalog.templates[0].clone();
        heavy.id = "heavy_chamber".to_string();
        heavy.weight = 5.0;
        let mut tied = heavy.clone();
        tied.id = "tied_chamber".to_string();
        catalog.templates.push(heavy);
        catalog.templates.push(tied);
        let repo = DescriptorRepository::builder().with_catalog(catalog).build().unwrap();
        assert_eq!(
            repo.base_template(RoomArchetype::Chamber).unwrap().id,
            "heavy_chamber"
        );
        assert_eq!(repo.base_templates_for(RoomArchetype::Chamber).len(), 3);
        assert!(repo.base_template(RoomArchetype::BossArena).is_none());
    }

    #[test]
    fn choose_base_template_is_deterministic() {
        let repo = minimal();
        let mut r1 = StdRng::seed_from_u64(9);
        let mut r2 = StdRng::seed_from_u64(9);
        assert_eq!(
            repo.choose_base_template(RoomArchetype::Corridor, &mut r1).map(|t| &t.id),
            repo.choose_base_template(RoomArchetype::Corridor, &mut r2).map(|t| &t.id)
        );
        assert!(repo
            .choose_base_template(RoomArchetype::Stairwell, &mut r1)
            .is_none());
    }

    #[test]
    fn choose_function_respects_affinity() {
        let repo = minimal();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let f = repo.choose_function(Biome::Citadel, &mut rng).unwrap();
            assert_eq!(f.name, "Guard Post");
        }
    }

    #[test]
    fn stats_count_everything() {
        let stats = minimal().stats();
        assert_eq!(stats.templates, 2);
        assert_eq!(stats.modifiers, 2);
        assert_eq!(stats.functions, 2);
        assert_eq!(stats.fragments, 7);
        assert_eq!(stats.fragments_by_category[&FragmentCategory::Detail], 3);
        assert_eq!(stats.estimated_combinations, 12);
    }

    #[test]
    fn empty_builder_fails() {
        let err = DescriptorRepository::builder().build().unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Content(ContentError::EmptyCategory(_))
        ));
    }

    #[test]
    fn invalid_overlay_aborts_build() {
        let overlay = DescriptorCatalog::parse_ron(
            r#"(fragments: [(text: "Gravel", category: Spatial, weight: -1.0)])"#,
        )
        .unwrap();
        let result = DescriptorRepository::builder()
            .with_catalog(DescriptorCatalog::parse_ron(MINIMAL).unwrap())
            .with_catalog(overlay)
            .build();
        assert!(matches!(
            result,
            Err(RepositoryError::Content(ContentError::NonPositiveWeight { .. }))
        ));
    }

    #[test]
    fn lookup_helpers() {
        let repo = minimal();
        assert!(repo.template_by_id("test_corridor").is_some());
        assert!(repo.template_by_id("nope").is_none());
        assert!(repo.function_by_name("guard post").is_some());
    }
}
