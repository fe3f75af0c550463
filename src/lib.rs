//! Descriptor Engine: room names and descriptions for procedural dungeons.
//!
//! Rooms are composed in three tiers: a structural base template for the
//! room's archetype, a biome modifier that supplies flavor and mechanical
//! effects, and weighted atmospheric fragments sampled per slot. An optional
//! room function layers a semantic purpose on top.
//!
//! ```no_run
//! use descriptor_engine::core::compose::RoomDescriptorService;
//! use descriptor_engine::schema::biome::{Biome, RoomArchetype};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let service = RoomDescriptorService::builtin()?;
//! let mut rng = StdRng::seed_from_u64(42);
//! if let Some(room) =
//!     service.generate_room(RoomArchetype::Chamber, Biome::Niflheim, &[], &mut rng, None)
//! {
//!     println!("{}\n{}", room.name, room.description);
//! }
//! # Ok::<(), descriptor_engine::core::repository::RepositoryError>(())
//! ```

pub mod config;
pub mod content;
pub mod core;
pub mod schema;
