//! Effect tuning.
//!
//! Games configure deferred effects at startup through `EffectConfig`.
//! Everything that varies between rule sets (spawn ratios, revive limits,
//! the templates used for summoned helpers) lives here rather than in the
//! effect code.

use serde::{Deserialize, Serialize};

use super::actor::{Faction, SpeciesId};
use super::rng::Dice;
use super::template::GenerationTemplate;

/// Species of the parasite summoned by infestation.
pub const SCARAB_SPECIES: SpeciesId = SpeciesId(900);

/// Species of the weapon spirit summoned by spectral weapons.
pub const SPECTRAL_WEAPON_SPECIES: SpeciesId = SpeciesId(901);

/// Minion spawning when a spawner is hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnOnHitConfig {
    /// Damage needed per spawned minion. Remainders round randomly.
    pub damage_per_spawn: i32,

    /// Cap on minions created by a single (merged) hit.
    pub max_per_hit: u32,
}

impl Default for SpawnOnHitConfig {
    fn default() -> Self {
        Self {
            damage_per_spawn: 12,
            max_per_hit: 8,
        }
    }
}

/// Deferred effect configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub spawn_on_hit: SpawnOnHitConfig,

    /// How far from the requested cell spawned actors may land.
    pub spawn_search_radius: i32,

    /// How many times a single line of actors can be revived.
    pub max_revives: u8,

    /// Number of illusory copies created on death.
    pub clone_count: u32,

    /// Turns an illusory copy lasts.
    pub clone_duration: u32,

    /// Parasite summoned at an infested corpse.
    pub infestation: GenerationTemplate,

    /// Turns the parasite lasts.
    pub infestation_duration: u32,

    /// Weapon spirit summoned next to a spectral weapon's target.
    pub spectral_weapon: GenerationTemplate,

    /// Damage of a weapon spirit's strike.
    pub spectral_weapon_damage: Dice,

    /// Turns a weapon spirit lasts.
    pub spectral_weapon_duration: u32,

    /// Upper bound on discharge range.
    pub discharge_max_range: i32,

    /// Whether deaths caused by effects leave blood.
    pub bleed_on_kill: bool,

    /// Blood left by a death.
    pub kill_blood: u32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            spawn_on_hit: SpawnOnHitConfig::default(),
            spawn_search_radius: 2,
            max_revives: 1,
            clone_count: 2,
            clone_duration: 20,
            infestation: GenerationTemplate::new("death scarab", SCARAB_SPECIES, 12)
                .with_faction(Faction::Friendly)
                .bloodless(),
            infestation_duration: 30,
            spectral_weapon: GenerationTemplate::new("spectral weapon", SPECTRAL_WEAPON_SPECIES, 10)
                .bloodless(),
            spectral_weapon_damage: Dice::new(2, 6),
            spectral_weapon_duration: 4,
            discharge_max_range: 3,
            bleed_on_kill: true,
            kill_blood: 2,
        }
    }
}

impl EffectConfig {
    /// Set the damage needed per spawned minion.
    #[must_use]
    pub fn with_damage_per_spawn(mut self, damage: i32) -> Self {
        self.spawn_on_hit.damage_per_spawn = damage;
        self
    }

    /// Set the spawn search radius.
    #[must_use]
    pub fn with_spawn_search_radius(mut self, radius: i32) -> Self {
        self.spawn_search_radius = radius;
        self
    }

    /// Set the revive limit.
    #[must_use]
    pub fn with_max_revives(mut self, max: u8) -> Self {
        self.max_revives = max;
        self
    }

    /// Set how many illusory copies appear on death.
    #[must_use]
    pub fn with_clone_count(mut self, count: u32) -> Self {
        self.clone_count = count;
        self
    }

    /// Set the discharge range cap.
    #[must_use]
    pub fn with_discharge_max_range(mut self, range: i32) -> Self {
        self.discharge_max_range = range;
        self
    }

    /// Disable blood on effect kills.
    #[must_use]
    pub fn without_kill_blood(mut self) -> Self {
        self.bleed_on_kill = false;
        self
    }
}
