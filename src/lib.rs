//! # deferred-effects
//!
//! Deferred side effects ("final effects") for turn-based combat.
//!
//! ## Design Principles
//!
//! 1. **Schedule Now, Fire Later**: While an attack, blast or death is
//!    resolving, its consequences are queued instead of executed. Nothing
//!    scheduled mutates the world until the queue is drained.
//!
//! 2. **Merge Once**: Equivalent effects queued in the same tick fold into
//!    the first one (two reflections of the same hit become one bigger
//!    reflection), so each consequence fires exactly once.
//!
//! 3. **Stable IDs**: Effects hold `ActorId`s and look actors up when they
//!    fire. An actor that died in the meantime makes its effect a no-op.
//!
//! ## Modules
//!
//! - `core`: Actors, coordinates, map, world, RNG, configuration
//! - `rules`: CombatRules trait for blast geometry and relocation
//! - `effects`: The final effect kinds and their firing logic
//! - `queue`: EffectQueue with merge-on-schedule and the drain
//! - `session`: CombatSession tying it together with snapshots

pub mod core;
pub mod effects;
pub mod queue;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Actor, ActorId, ActorKind, Coord, Dice, EffectConfig, Faction, GameRng, GameRngState,
    GenerationTemplate, Hit, HurtOutcome, Map, SpeciesId, Status, World, WorldAction, WorldError,
};

pub use crate::effects::{
    ActionTrigger, Anguish, AvoidedDeath, Blink, BloodPool, CloneOnDeath, DeathCurse, Deferred,
    DeferredDamage, DelayedAction, DerivedUndead, Discharge, EffectKind, Explosion, FinalEffect,
    FireContext, Infestation, Killer, MirrorDamage, Origin, Retribution, Revival, SpawnOnHit,
    SpectralWeapon, StarcursedMerge, SummonDismissal, Teleport, TrampleFollow,
};

pub use crate::queue::{DrainReport, EffectQueue, Scheduled};

pub use crate::rules::{Blast, CombatRules, Relocation, StandardRules};

pub use crate::session::{CombatSession, SessionError};
