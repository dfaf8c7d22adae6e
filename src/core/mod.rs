//! Core types: actors, coordinates, the map, the world, RNG, configuration.
//!
//! These are the collaborators deferred effects act on. They model only
//! what effects read and write; a game embeds them in its own state.

pub mod actor;
pub mod config;
pub mod coord;
pub mod error;
pub mod map;
pub mod rng;
pub mod template;
pub mod world;

pub use actor::{Actor, ActorId, ActorKind, Faction, SpeciesId, Status};
pub use config::{EffectConfig, SpawnOnHitConfig, SCARAB_SPECIES, SPECTRAL_WEAPON_SPECIES};
pub use coord::Coord;
pub use error::{WorldError, WorldResult};
pub use map::{Cell, Map};
pub use rng::{Dice, GameRng, GameRngState};
pub use template::GenerationTemplate;
pub use world::{Corpse, Hit, HurtOutcome, World, WorldAction, WorldSnapshot};
