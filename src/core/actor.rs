//! Actor identification and per-actor combat data.
//!
//! Every combatant (the player or a monster) has a unique `ActorId`.
//!
//! ## ID Stability
//!
//! IDs are allocated monotonically by the [`World`](super::World) and are
//! never reused within a session. A scheduled effect can therefore hold an
//! `ActorId` across the deferral window and resolve it later: if the actor
//! died or was removed in the meantime the lookup returns `None`.
//!
//! ```
//! use deferred_effects::core::ActorId;
//!
//! let id = ActorId::new(7);
//! assert_eq!(id.raw(), 7);
//! assert_eq!(format!("{}", id), "Actor(7)");
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// Unique identifier for a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    /// Create an actor ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ActorId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

/// Species identifier. Games define what species exist.
///
/// The engine only compares species: blood pools merge per species,
/// starcursed masses link with their own kind, weapon spirits are found
/// by species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpeciesId(pub u16);

impl SpeciesId {
    /// Create a new species ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Species({})", self.0)
    }
}

/// Whether an actor is the player or a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Monster,
}

/// Attitude towards the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    Hostile,
    Neutral,
    Friendly,
}

/// Timed conditions an effect can inflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Slowed,
    Paralysed,
    Drained,
    /// Illusory copy; vanishes when dismissed.
    Illusory,
}

/// A live combatant.
///
/// Only the fields deferred effects read or write are modelled here. The
/// wider game keeps whatever else it needs alongside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub species: SpeciesId,
    pub kind: ActorKind,
    pub faction: Faction,

    /// Current hit points. Zero or below means dead, even while the actor
    /// is still in the directory (see `AvoidedDeath`).
    pub hp: i32,
    pub max_hp: i32,

    pub position: Coord,
    pub experience_level: u8,

    /// Stationary actors never follow a trampled target.
    pub stationary: bool,

    /// Whether killing this actor leaves blood.
    pub bleeds: bool,

    /// Who summoned this actor, if anyone.
    pub summoner: Option<ActorId>,

    /// Remaining turns for temporary summons. `None` means permanent.
    pub summon_duration: Option<u32>,

    /// How many times this actor has already been revived.
    pub revives: u8,

    /// Current target of hostility.
    pub foe: Option<ActorId>,

    /// Original species of a transformed actor.
    pub transformed_from: Option<SpeciesId>,

    /// Timed statuses and their remaining turns.
    #[serde(default)]
    pub statuses: FxHashMap<Status, u32>,

    /// Notes on who is responsible for this actor's existence.
    #[serde(default)]
    pub blame: Vec<String>,
}

impl Actor {
    /// Check if the actor still counts as alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Check if this actor is the player.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }

    /// Check if this actor is a temporary summon.
    #[must_use]
    pub fn is_temporary_summon(&self) -> bool {
        self.summoner.is_some() && self.summon_duration.is_some()
    }

    /// Check if two actors are on the same side.
    ///
    /// The player counts as `Friendly`.
    #[must_use]
    pub fn is_aligned_with(&self, faction: Faction) -> bool {
        self.effective_faction() == faction
    }

    /// Faction used for alignment checks.
    #[must_use]
    pub fn effective_faction(&self) -> Faction {
        if self.is_player() {
            Faction::Friendly
        } else {
            self.faction
        }
    }

    /// Apply a status, keeping the longer duration if already present.
    pub fn apply_status(&mut self, status: Status, turns: u32) {
        let entry = self.statuses.entry(status).or_insert(0);
        *entry = (*entry).max(turns);
    }

    /// Remaining turns of a status (0 if absent).
    #[must_use]
    pub fn status(&self, status: Status) -> u32 {
        self.statuses.get(&status).copied().unwrap_or(0)
    }

    /// Check if a status is active.
    #[must_use]
    pub fn has_status(&self, status: Status) -> bool {
        self.status(status) > 0
    }
}
