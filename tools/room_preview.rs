/// Room Preview: interactive composition shell for trying out descriptor content.
///
/// Usage: room_preview [--config <file>] [--content <dir>]... [--no-builtin] [--seed <n>]
///
/// Commands:
///   room <archetype> <biome> [function]  compose one room ("random" picks a function)
///   bulk <n>                             compose n random rooms with variety stats
///   stats                                catalog sizes and combination estimate
///   effects <biome>                      the biome's modifier and effect tags
///   seed <n>                             reset the RNG
///   help                                 list commands
///   quit                                 exit

use clap::Parser;
use descriptor_engine::config::DescriptorConfig;
use descriptor_engine::core::compose::{RoomDescription, RoomDescriptorService};
use descriptor_engine::core::repository::DescriptorRepository;
use descriptor_engine::core::text::has_unresolved_braces;
use descriptor_engine::schema::biome::{Biome, RoomArchetype};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "room_preview")]
#[command(about = "Compose room names and descriptions interactively")]
struct Args {
    /// Engine configuration file (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra content directory, layered after those in the config
    #[arg(long = "content")]
    content: Vec<PathBuf>,

    /// Skip the built-in catalog
    #[arg(long)]
    no_builtin: bool,

    /// Initial RNG seed
    #[arg(short, long, default_value = "42")]
    seed: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match DescriptorConfig::load_from_ron(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                process::exit(1);
            }
        },
        None => DescriptorConfig::default(),
    };
    config.content.directories.extend(args.content.iter().cloned());
    if args.no_builtin {
        config.content.include_builtin = false;
    }

    let repository = match DescriptorRepository::from_config(&config) {
        Ok(repository) => Arc::new(repository),
        Err(e) => {
            eprintln!("ERROR: Failed to build repository: {}", e);
            process::exit(1);
        }
    };
    let service = RoomDescriptorService::new(repository);

    let stats = service.repository().stats();
    println!(
        "Loaded {} templates, {} modifiers, {} functions, {} fragments",
        stats.templates, stats.modifiers, stats.functions, stats.fragments
    );
    println!("Seed: {}", args.seed);
    println!("Type 'help' for commands.\n");

    let mut current_seed = args.seed;
    let mut rng = StdRng::seed_from_u64(current_seed);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("rooms> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "room" => {
                if parts.len() < 3 {
                    println!("Usage: room <archetype> <biome> [function]");
                    println!(
                        "  archetype: corridor, chamber, junction, dead_end, stairwell, boss_arena"
                    );
                    println!(
                        "  biome: surface, roots, muspelheim, niflheim, alfheim, jotunheim, citadel"
                    );
                    continue;
                }
                let archetype: RoomArchetype = match parts[1].parse() {
                    Ok(a) => a,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let biome: Biome = match parts[2].parse() {
                    Ok(b) => b,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                let repository = service.repository();
                let function = match parts.get(3..).map(|rest| rest.join(" ")) {
                    Some(name) if name.eq_ignore_ascii_case("random") => {
                        repository.choose_function(biome, &mut rng)
                    }
                    Some(name) if !name.is_empty() => match repository.function_by_name(&name) {
                        Some(f) => Some(f),
                        None => {
                            println!("Unknown function: {}", name);
                            continue;
                        }
                    },
                    _ => None,
                };

                match service.generate_room(archetype, biome, &[], &mut rng, function) {
                    Some(room) => print_room(&room),
                    None => println!("No template for archetype {}", archetype),
                }
            }
            "bulk" => {
                if parts.len() < 2 {
                    println!("Usage: bulk <n>");
                    continue;
                }
                let count: usize = match parts[1].parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Invalid count: {}", parts[1]);
                        continue;
                    }
                };
                run_bulk(&service, count, &mut rng);
            }
            "stats" => {
                let stats = service.repository().stats();
                println!("Templates:  {}", stats.templates);
                println!("Modifiers:  {}", stats.modifiers);
                println!("Functions:  {}", stats.functions);
                println!("Fragments:  {}", stats.fragments);
                for (category, count) in &stats.fragments_by_category {
                    println!("  {:<14} {}", format!("{:?}", category), count);
                }
                println!("Estimated combinations: {}", stats.estimated_combinations);
            }
            "effects" => {
                if parts.len() < 2 {
                    println!("Usage: effects <biome>");
                    continue;
                }
                let biome: Biome = match parts[1].parse() {
                    Ok(b) => b,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let modifier = service.repository().modifier(biome);
                if modifier.biome != biome {
                    println!("({} has no modifier; using {})", biome, modifier.biome);
                }
                println!("{} / {}", modifier.name, modifier.adjective);
                let tags = modifier.effect_tags();
                if tags.is_empty() {
                    println!("  no effects");
                }
                for tag in tags {
                    println!("  {}", tag);
                }
            }
            "seed" => {
                if parts.len() < 2 {
                    println!("Current seed: {}", current_seed);
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(s) => {
                        current_seed = s;
                        rng = StdRng::seed_from_u64(current_seed);
                        println!("Seed set to {}", current_seed);
                    }
                    Err(_) => {
                        println!("Invalid seed: {}", parts[1]);
                    }
                }
            }
            _ => {
                println!("Unknown command: {}. Type 'help' for commands.", cmd);
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  room <archetype> <biome> [function]  Compose one room");
    println!("                                       (function by name, or 'random')");
    println!("  bulk <n>                             Compose n random rooms with variety stats");
    println!("  stats                                Catalog sizes");
    println!("  effects <biome>                      Show the biome's modifier and effect tags");
    println!("  seed <n>                             Reset the RNG seed");
    println!("  help                                 Show this help");
    println!("  quit                                 Exit");
}

fn print_room(room: &RoomDescription) {
    println!("\n--- {} ---", room.name);
    println!("{}", room.description);
    println!(
        "[{} | {:?} | exits {}-{} | spawn x{} | template {}]",
        room.biome,
        room.size,
        room.min_exits,
        room.max_exits,
        room.spawn_budget_multiplier,
        room.template_id
    );
    if !room.effect_tags.is_empty() {
        println!("effects: {}", room.effect_tags.join(", "));
    }
    println!();
}

/// Tallies over the rooms a `bulk` run actually produced.
#[derive(Debug, Default)]
struct BulkStats {
    requested: usize,
    generated: usize,
    total_len: usize,
    leaks: usize,
    names: FxHashSet<String>,
    descriptions: FxHashSet<String>,
}

impl BulkStats {
    fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    fn record(&mut self, room: RoomDescription) {
        if has_unresolved_braces(&room.name) || has_unresolved_braces(&room.description) {
            self.leaks += 1;
            println!("LEAK: {} / {}", room.name, room.description);
        }
        self.generated += 1;
        self.total_len += room.description.len();
        self.names.insert(room.name);
        self.descriptions.insert(room.description);
    }

    /// `None` until at least one room was generated.
    fn mean_length(&self) -> Option<f64> {
        (self.generated > 0).then(|| self.total_len as f64 / self.generated as f64)
    }

    fn print(&self) {
        println!(
            "\n=== Bulk Stats ({} of {} rooms generated) ===",
            self.generated, self.requested
        );
        println!("Distinct names:        {}", self.names.len());
        println!("Distinct descriptions: {}", self.descriptions.len());
        if let Some(mean) = self.mean_length() {
            println!("Mean description length: {:.1}", mean);
        }
        println!("Unresolved tokens:     {}", self.leaks);
        println!();
    }
}

fn run_bulk(service: &RoomDescriptorService, count: usize, rng: &mut StdRng) {
    let repository = service.repository();
    let mut stats = BulkStats::new(count);

    for _ in 0..count {
        let archetype = *RoomArchetype::all()
            .choose(rng)
            .unwrap_or(&RoomArchetype::Chamber);
        let biome = *Biome::all().choose(rng).unwrap_or(&Biome::DEFAULT);
        let function = repository.choose_function(biome, rng);
        if let Some(room) = service.generate_room(archetype, biome, &[], rng, function) {
            stats.record(room);
        }
    }

    stats.print();
}
