/// Content Linter: validates descriptor catalogs and reports thin coverage.
///
/// Usage: content_linter [<content_dir>...] [--no-builtin] [--enforce-conventions]

use clap::Parser;
use descriptor_engine::config::ConventionLimits;
use descriptor_engine::content::builtin_catalog;
use descriptor_engine::core::catalog::DescriptorCatalog;
use descriptor_engine::core::token::Token;
use descriptor_engine::schema::biome::{Biome, RoomArchetype};
use descriptor_engine::schema::fragment::FragmentCategory;
use std::path::{Path, PathBuf};
use std::process;

/// Fewer fragments than this for a category/biome pair is flagged.
const MIN_VARIETY: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "content_linter")]
#[command(about = "Validate room descriptor content and report coverage gaps")]
struct Args {
    /// Content directories or single `.ron` files, layered in order
    content: Vec<PathBuf>,

    /// Lint the given content alone, without the built-in catalog underneath
    #[arg(long)]
    no_builtin: bool,

    /// Treat convention breaches as errors
    #[arg(long)]
    enforce_conventions: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut catalog = DescriptorCatalog::default();
    if !args.no_builtin {
        match builtin_catalog() {
            Ok(builtin) => catalog.merge(builtin),
            Err(e) => {
                eprintln!("ERROR: Failed to parse built-in catalog: {}", e);
                process::exit(1);
            }
        }
    }

    let mut load_failures = Vec::new();
    for path in &args.content {
        if path.is_file() {
            load_file(path, &mut catalog, &mut load_failures);
        } else if path.is_dir() {
            load_recursive(path, &mut catalog, &mut load_failures);
        } else {
            eprintln!("ERROR: Path '{}' does not exist", path.display());
            process::exit(1);
        }
    }

    println!(
        "Loaded {} fragments, {} modifiers, {} templates, {} functions",
        catalog.fragments.len(),
        catalog.modifiers.len(),
        catalog.templates.len(),
        catalog.functions.len()
    );

    let limits = ConventionLimits {
        enforce: args.enforce_conventions,
        ..ConventionLimits::default()
    };
    let (mut errors, warnings) = lint_catalog(&catalog, &limits);
    errors.splice(0..0, load_failures);

    println!("\n=== Content Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

fn load_file(path: &Path, catalog: &mut DescriptorCatalog, failures: &mut Vec<String>) {
    match DescriptorCatalog::load_from_ron(path) {
        Ok(loaded) => {
            println!("  Loaded: {}", path.display());
            catalog.merge(loaded);
        }
        Err(e) => failures.push(format!("{}: {}", path.display(), e)),
    }
}

fn load_recursive(dir: &Path, catalog: &mut DescriptorCatalog, failures: &mut Vec<String>) {
    let mut paths: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|entry| entry.path()).collect(),
        Err(e) => {
            failures.push(format!("{}: {}", dir.display(), e));
            return;
        }
    };
    paths.sort();

    for path in paths {
        if path.is_dir() {
            load_recursive(&path, catalog, failures);
        } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            load_file(&path, catalog, failures);
        }
    }
}

fn lint_catalog(
    catalog: &DescriptorCatalog,
    limits: &ConventionLimits,
) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Structural validation stops at the first problem, same as the repository builder.
    if let Err(e) = catalog.validate(limits) {
        errors.push(e.to_string());
    }

    // Low variety per category and biome
    for category in FragmentCategory::all() {
        for biome in Biome::all() {
            let count = catalog
                .fragments
                .iter()
                .filter(|f| f.category == *category && f.matches_biome(*biome))
                .count();
            if count < MIN_VARIETY {
                warnings.push(format!(
                    "{:?} has only {} fragments usable in {} (minimum {} recommended)",
                    category, count, biome, MIN_VARIETY
                ));
            }
        }
    }

    // Biomes that only ever see universal functions
    for biome in Biome::all() {
        if !catalog.functions.iter().any(|f| f.affinity.names(*biome)) {
            warnings.push(format!("Biome {} has no biome-specific room function", biome));
        }
    }

    for archetype in RoomArchetype::all() {
        if !catalog.templates.iter().any(|t| t.archetype == *archetype) {
            errors.push(format!("Archetype {} has no base template", archetype));
        }
    }

    for template in &catalog.templates {
        let uses_function = template.name.contains(Token::Function)
            || template.description.contains(Token::Function);
        if !uses_function {
            warnings.push(format!(
                "Template '{}' never uses {} and ignores room functions",
                template.id,
                Token::Function
            ));
        }
    }

    (errors, warnings)
}
