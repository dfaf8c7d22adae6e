//! Generation templates: how to create a new actor.
//!
//! Effects that spawn (revival, derived undead, minions, weapon spirits)
//! carry a template captured by value at schedule time. The template is
//! passed through to [`World::spawn`](super::World::spawn) unmodified
//! apart from the fields the effect itself is responsible for (faction,
//! foe, summoner).

use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, Faction, SpeciesId};

/// Description of an actor to be created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTemplate {
    pub name: String,
    pub species: SpeciesId,
    pub faction: Faction,
    pub max_hp: i32,
    pub experience_level: u8,
    pub bleeds: bool,
    pub stationary: bool,
    pub summoner: Option<ActorId>,
    pub summon_duration: Option<u32>,
    pub foe: Option<ActorId>,
}

impl GenerationTemplate {
    /// Create a hostile, permanent, bleeding template.
    pub fn new(name: impl Into<String>, species: SpeciesId, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            species,
            faction: Faction::Hostile,
            max_hp,
            experience_level: 1,
            bleeds: true,
            stationary: false,
            summoner: None,
            summon_duration: None,
            foe: None,
        }
    }

    /// Capture a template that recreates `actor` at full health.
    #[must_use]
    pub fn from_actor(actor: &Actor) -> Self {
        Self {
            name: actor.name.clone(),
            species: actor.species,
            faction: actor.faction,
            max_hp: actor.max_hp,
            experience_level: actor.experience_level,
            bleeds: actor.bleeds,
            stationary: actor.stationary,
            summoner: actor.summoner,
            summon_duration: actor.summon_duration,
            foe: actor.foe,
        }
    }

    /// Set the faction (builder pattern).
    #[must_use]
    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    /// Set the experience level (builder pattern).
    #[must_use]
    pub fn with_experience_level(mut self, level: u8) -> Self {
        self.experience_level = level;
        self
    }

    /// Set the initial foe (builder pattern).
    #[must_use]
    pub fn with_foe(mut self, foe: Option<ActorId>) -> Self {
        self.foe = foe;
        self
    }

    /// Mark as summoned by `owner` (builder pattern).
    ///
    /// `duration` of `None` makes a permanent summon.
    #[must_use]
    pub fn summoned_by(mut self, owner: ActorId, duration: Option<u32>) -> Self {
        self.summoner = Some(owner);
        self.summon_duration = duration;
        self
    }

    /// Mark as bloodless (builder pattern).
    #[must_use]
    pub fn bloodless(mut self) -> Self {
        self.bleeds = false;
        self
    }

    /// Mark as stationary (builder pattern).
    #[must_use]
    pub fn stationary(mut self) -> Self {
        self.stationary = true;
        self
    }
}
