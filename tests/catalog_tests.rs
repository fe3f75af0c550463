//! Repository integration tests: built-in catalog coverage and layered loading.

use descriptor_engine::config::{ConventionLimits, DescriptorConfig};
use descriptor_engine::core::catalog::DescriptorCatalog;
use descriptor_engine::core::repository::{DescriptorRepository, RepositoryError};
use descriptor_engine::schema::biome::{Biome, RoomArchetype};
use descriptor_engine::schema::error::ContentError;
use descriptor_engine::schema::fragment::FragmentCategory;
use std::path::Path;
use std::sync::Arc;

fn builtin() -> DescriptorRepository {
    DescriptorRepository::builtin().unwrap()
}

// ---------------------------------------------------------------------------
// Built-in catalog completeness
// ---------------------------------------------------------------------------

#[test]
fn builtin_collection_minimums() {
    let repo = builtin();
    assert!(repo.all_modifiers().len() >= 5);
    assert!(repo.all_base_templates().len() >= 18);
    assert!(repo.all_functions().len() >= 18);

    let minimums = [
        (FragmentCategory::Spatial, 5),
        (FragmentCategory::Architectural, 10),
        (FragmentCategory::Detail, 20),
        (FragmentCategory::Atmospheric, 50),
        (FragmentCategory::Direction, 5),
    ];
    for (category, min) in minimums {
        let count = repo.fragments(category, None).len();
        assert!(count >= min, "{category:?}: {count} < {min}");
    }
}

#[test]
fn every_archetype_has_a_template() {
    let repo = builtin();
    for archetype in RoomArchetype::all() {
        let template = repo
            .base_template(*archetype)
            .unwrap_or_else(|| panic!("no template for {archetype}"));
        assert_eq!(template.archetype, *archetype);
    }
}

#[test]
fn representative_templates_are_heaviest() {
    let repo = builtin();
    for archetype in RoomArchetype::all() {
        let best = repo.base_template(*archetype).unwrap();
        for other in repo.base_templates_for(*archetype) {
            assert!(other.weight <= best.weight);
        }
    }
    assert_eq!(repo.base_template(RoomArchetype::Chamber).unwrap().id, "chamber_hall");
}

#[test]
fn every_biome_has_a_function() {
    let repo = builtin();
    for biome in Biome::all() {
        assert!(
            !repo.functions_by_biome(*biome).is_empty(),
            "no function for {biome}"
        );
    }
}

#[test]
fn every_category_reachable_from_every_biome() {
    let repo = builtin();
    for biome in Biome::all() {
        for category in FragmentCategory::all() {
            assert!(
                !repo.fragments(*category, Some(*biome)).is_empty(),
                "{category:?} empty for {biome}"
            );
        }
    }
}

#[test]
fn filtered_fragments_are_an_ordered_subset() {
    let repo = builtin();
    for category in FragmentCategory::all() {
        let all = repo.fragments(*category, None);
        for biome in Biome::all() {
            let filtered = repo.fragments(*category, Some(*biome));
            let mut last = None;
            for fragment in filtered {
                assert!(fragment.matches_biome(*biome));
                let pos = all
                    .iter()
                    .position(|f| std::ptr::eq(*f, fragment))
                    .expect("filtered fragment missing from unfiltered list");
                assert!(last.map_or(true, |l| pos > l), "order broken for {biome}");
                last = Some(pos);
            }
        }
    }
}

#[test]
fn subcategories_are_known() {
    let repo = builtin();
    for category in FragmentCategory::all() {
        for fragment in repo.fragments(*category, None) {
            if let Some(sub) = &fragment.subcategory {
                assert!(
                    category.subcategories().contains(&sub.as_str()),
                    "{sub} is not a {category:?} subcategory"
                );
            }
        }
    }
}

#[test]
fn spatial_fragments_filter_by_tag() {
    let repo = builtin();
    let cramped = repo.fragments_tagged(FragmentCategory::Spatial, None, &["Cramped"]);
    let vast = repo.fragments_tagged(FragmentCategory::Spatial, None, &["Vast"]);
    assert_eq!(cramped.len(), 3);
    assert_eq!(vast.len(), 2);
    assert!(cramped.iter().all(|f| f.has_tag("Cramped")));
    assert!(vast.iter().all(|f| !f.has_tag("Cramped")));

    let either = repo.fragments_tagged(
        FragmentCategory::Spatial,
        Some(Biome::Muspelheim),
        &["Cramped", "Vast"],
    );
    assert_eq!(either.len(), 5);

    let all = repo.fragments(FragmentCategory::Spatial, Some(Biome::Muspelheim));
    let mut positions = either
        .iter()
        .map(|f| all.iter().position(|a| std::ptr::eq(*a, *f)).unwrap());
    let mut last = positions.next().unwrap();
    for p in positions {
        assert!(p > last);
        last = p;
    }

    assert!(repo
        .fragments_tagged(FragmentCategory::Spatial, None, &["NoSuchTag"])
        .is_empty());
    assert_eq!(
        repo.fragments_tagged(FragmentCategory::Spatial, None, &[]).len(),
        repo.fragments(FragmentCategory::Spatial, None).len()
    );
}

#[test]
fn function_details_have_reasonable_length() {
    let repo = builtin();
    for function in repo.all_functions() {
        let len = function.detail_sentence.len();
        assert!((20..=500).contains(&len), "{}: {len} chars", function.name);
    }
}

#[test]
fn muspelheim_has_functions_niflheim_lacks() {
    let repo = builtin();
    let niflheim: Vec<&str> = repo
        .functions_by_biome(Biome::Niflheim)
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    let exclusive: Vec<&str> = repo
        .functions_by_biome(Biome::Muspelheim)
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| !niflheim.contains(name))
        .collect();
    assert!(exclusive.contains(&"Forge"), "{exclusive:?}");
}

#[test]
fn known_modifiers_and_effects() {
    let repo = builtin();

    let rusted = repo.modifier(Biome::TheRoots);
    assert_eq!(rusted.name, "Rusted");
    assert_eq!(rusted.adjective, "corroded");
    assert_eq!(rusted.effect_tags(), vec!["HpMod:0.7", "Brittle"]);

    let scorched = repo.modifier(Biome::Muspelheim);
    assert_eq!(scorched.damage_per_turn(), 2);
    assert_eq!(scorched.damage_type(), Some("fire"));
    assert_eq!(scorched.effect_tags(), vec!["DamageAura:fire:2"]);

    let frozen = repo.modifier(Biome::Niflheim);
    assert_eq!(frozen.adjective, "ice-covered");
    assert_eq!(frozen.detail_fragment, "is encased in frost");
    assert_eq!(frozen.effect_tags(), vec!["DamageAura:cold:1", "Slippery"]);

    let alfheim = repo.modifier(Biome::Alfheim);
    assert_eq!(alfheim.adjective, "crystalline");
    assert_eq!(alfheim.effect_tags(), vec!["LightSource", "Dazzle"]);

    let jotunheim = repo.modifier(Biome::Jotunheim);
    assert_eq!(jotunheim.adjective, "monolithic");
    assert!(jotunheim.effect_tags().contains(&"Scale:2.0".to_string()));

    let citadel = repo.modifier(Biome::Citadel);
    assert_eq!(citadel.name, "Ancient");
    assert!(citadel.effect_tags().is_empty());
}

#[test]
fn surface_falls_back_to_citadel() {
    let repo = builtin();
    assert_eq!(repo.modifier(Biome::Surface), repo.modifier(Biome::Citadel));
}

#[test]
fn stats_report_combinations() {
    let stats = builtin().stats();
    assert_eq!(stats.templates, 19);
    assert_eq!(stats.modifiers, 6);
    let expected = [
        FragmentCategory::Spatial,
        FragmentCategory::Architectural,
        FragmentCategory::Detail,
        FragmentCategory::Atmospheric,
    ]
    .iter()
    .map(|c| stats.fragments_by_category[c] as u64)
    .product::<u64>()
        * 19
        * 6;
    assert_eq!(stats.estimated_combinations, expected);
    assert!(stats.estimated_combinations > 1_000_000);
}

#[test]
fn repository_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DescriptorRepository>();
    assert_send_sync::<Arc<DescriptorRepository>>();
}

// ---------------------------------------------------------------------------
// Layered content
// ---------------------------------------------------------------------------

const FROST_PACK: &str = r#"(
    modifiers: [(
        biome: Niflheim,
        name: "Glacial",
        adjective: "glacier-bound",
        detail_fragment: "groans under the weight of old ice",
        hp_multiplier: 1.2,
        flags: [Slippery],
    )],
    functions: [(
        name: "Seal Pen",
        detail_sentence: "Low stone walls pen off a corner strewn with frozen straw.",
        affinity: Only([Niflheim]),
    )],
)"#;

#[test]
fn content_directory_layers_over_builtin() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("frost.ron"), FROST_PACK).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let repo = DescriptorRepository::builder()
        .with_builtin()
        .content_dir(dir.path())
        .build()
        .unwrap();

    let frozen = repo.modifier(Biome::Niflheim);
    assert_eq!(frozen.name, "Glacial");
    assert_eq!(frozen.effect_tags(), vec!["HpMod:1.2", "Slippery"]);
    assert_eq!(repo.all_modifiers().len(), builtin().all_modifiers().len());
    assert!(repo
        .functions_by_biome(Biome::Niflheim)
        .iter()
        .any(|f| f.name == "Seal Pen"));
}

#[test]
fn files_in_a_directory_merge_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    let pack = |name: &str| {
        format!(
            r#"(modifiers: [(biome: Alfheim, name: "{name}", adjective: "gleaming",
                detail_fragment: "hums with light")])"#
        )
    };
    std::fs::write(dir.path().join("b.ron"), pack("Second")).unwrap();
    std::fs::write(dir.path().join("a.ron"), pack("First")).unwrap();

    let repo = DescriptorRepository::builder()
        .with_builtin()
        .content_dir(dir.path())
        .build()
        .unwrap();
    assert_eq!(repo.modifier(Biome::Alfheim).name, "Second");
}

#[test]
fn malformed_content_file_is_a_ron_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.ron"), "(fragments: [(text: )])").unwrap();
    let result = DescriptorRepository::builder()
        .with_builtin()
        .content_dir(dir.path())
        .build();
    assert!(matches!(result, Err(RepositoryError::Ron(_))));
}

#[test]
fn invalid_content_file_is_a_content_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bad.ron"),
        r#"(templates: [(id: "bad", archetype: Corridor, name: "The {Modifier} Way",
            description: "A plain way.", min_exits: 1, max_exits: 2)])"#,
    )
    .unwrap();
    let result = DescriptorRepository::builder()
        .with_builtin()
        .content_dir(dir.path())
        .build();
    assert!(matches!(
        result,
        Err(RepositoryError::Content(ContentError::MissingToken { .. }))
    ));
}

#[test]
fn missing_directory_is_skipped() {
    let repo = DescriptorRepository::builder()
        .with_builtin()
        .content_dir("does/not/exist")
        .build()
        .unwrap();
    assert_eq!(repo.all_base_templates().len(), 19);
}

#[test]
fn from_config_reads_directories_and_conventions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("giant.ron"),
        r#"(modifiers: [(biome: Jotunheim, name: "Titanic", adjective: "titanic",
            detail_fragment: "dwarfs everything", scale_multiplier: 9.0)])"#,
    )
    .unwrap();

    let mut config = DescriptorConfig::default();
    config.content.directories.push(dir.path().to_path_buf());

    let lenient = DescriptorRepository::from_config(&config).unwrap();
    assert_eq!(lenient.modifier(Biome::Jotunheim).name, "Titanic");

    config.conventions = ConventionLimits {
        enforce: true,
        ..ConventionLimits::default()
    };
    let strict = DescriptorRepository::from_config(&config);
    assert!(matches!(
        strict,
        Err(RepositoryError::Content(ContentError::ConventionExceeded { .. }))
    ));
}

#[test]
fn config_without_builtin_needs_complete_content() {
    let config = DescriptorConfig::parse_ron("(content: (include_builtin: false))").unwrap();
    let result = DescriptorRepository::from_config(&config);
    assert!(matches!(
        result,
        Err(RepositoryError::Content(ContentError::EmptyCategory(_)))
    ));
}

#[test]
fn fixture_catalog_builds_standalone() {
    let catalog =
        DescriptorCatalog::load_from_ron(Path::new("tests/fixtures/minimal_catalog.ron")).unwrap();
    let repo = DescriptorRepository::builder()
        .with_catalog(catalog)
        .build()
        .unwrap();
    assert_eq!(repo.all_base_templates().len(), 2);
    assert!(repo.base_template(RoomArchetype::Stairwell).is_none());
}
