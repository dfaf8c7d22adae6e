//! Effects that bring new actors into the world.
//!
//! All of these carry a [`GenerationTemplate`] captured when they were
//! scheduled, or take one from [`EffectConfig`](crate::core::EffectConfig)
//! at fire time. Spawns land as close to the origin as the configured
//! search radius allows; if there is no room the spawn is dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    Actor, ActorId, Coord, Faction, GenerationTemplate, Hit, Status,
};
use crate::queue::{EffectQueue, Scheduled};

use super::context::{skip, FireContext};
use super::effect::{Deferred, EffectKind, Origin};

/// Minions split off a spawner that was hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnOnHit {
    pub origin: Origin,
    pub damage: i32,
    /// What to spawn.
    pub template: GenerationTemplate,
    /// Spawner's faction when hit.
    pub faction: Faction,
}

impl SpawnOnHit {
    /// Spawn `template` minions for `damage` dealt by `attacker` to `spawner`.
    pub fn schedule(
        queue: &mut EffectQueue,
        attacker: Option<&Actor>,
        spawner: &Actor,
        position: Coord,
        damage: i32,
        template: GenerationTemplate,
    ) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(attacker, Some(spawner), position),
            damage,
            template,
            faction: spawner.faction,
        })
    }
}

impl Deferred for SpawnOnHit {
    fn mergeable(&self, other: &Self) -> bool {
        self.origin == other.origin
    }

    fn merge(&mut self, other: Self) {
        self.damage = self.damage.saturating_add(other.damage);
    }

    fn fire(self, ctx: &mut FireContext<'_>) {
        if self.faction == Faction::Friendly {
            return skip(EffectKind::SpawnOnHit, "friendly spawner");
        }
        let settings = &ctx.config.spawn_on_hit;
        let count = ctx
            .world
            .rng
            .div_rand_round(self.damage, settings.damage_per_spawn)
            .min(i32::try_from(settings.max_per_hit).unwrap_or(i32::MAX));

        let foe = ctx.living(self.origin.attacker).map(|a| a.id);
        let template = self
            .template
            .clone()
            .with_faction(self.faction)
            .with_foe(foe);

        let spawned = (0..count)
            .filter(|_| ctx.spawn_near(&template, self.origin.position).is_some())
            .count();
        match spawned {
            0 => {}
            1 => ctx.world.message(format!("A {} splits off!", template.name)),
            n => ctx.world.message(format!("{} {}s split off!", n, template.name)),
        }
    }
}

/// Illusory duplicates left behind by a dying actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOnDeath {
    pub origin: Origin,
    pub template: GenerationTemplate,
}

impl CloneOnDeath {
    /// Clone `victim` where it stands.
    pub fn schedule(queue: &mut EffectQueue, victim: &Actor) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(None, Some(victim), victim.position),
            template: GenerationTemplate::from_actor(victim),
        })
    }
}

impl Deferred for CloneOnDeath {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let duration = ctx.config.clone_duration;
        let mut template = self.template;
        if let Some(owner) = self.origin.defender {
            template = template.summoned_by(owner, Some(duration));
        }

        let mut created = 0;
        for _ in 0..ctx.config.clone_count {
            let Some(id) = ctx.spawn_near(&template, self.origin.position) else {
                break;
            };
            if let Some(clone) = ctx.world.actor_mut(id) {
                clone.apply_status(Status::Illusory, duration);
            }
            created += 1;
        }
        if created > 0 {
            ctx.world
                .message(format!("Illusions of {} shimmer into view!", template.name));
        }
    }
}

/// A dead actor rising again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revival {
    pub origin: Origin,
    pub template: GenerationTemplate,
    /// Revivals already spent on this line of actors.
    pub revives_used: u8,
}

impl Revival {
    /// Revive `victim` where it fell.
    pub fn schedule(queue: &mut EffectQueue, victim: &Actor) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(None, Some(victim), victim.position),
            template: GenerationTemplate::from_actor(victim),
            revives_used: victim.revives,
        })
    }
}

impl Deferred for Revival {
    fn fire(self, ctx: &mut FireContext<'_>) {
        if self.revives_used >= ctx.config.max_revives {
            return skip(EffectKind::Revival, "out of revives");
        }
        let Some(id) = ctx.spawn_near(&self.template, self.origin.position) else {
            return;
        };
        if let Some(revived) = ctx.world.actor_mut(id) {
            revived.revives = self.revives_used + 1;
        }
        debug!(from = ?self.origin.defender, to = %id, "revived");
        ctx.world.message(format!("{} rises from the dead!", self.template.name));
    }
}

/// A parasite bursting out of a corpse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infestation {
    pub origin: Origin,
    pub victim_name: String,
}

impl Infestation {
    /// Infest the corpse of `victim`.
    pub fn schedule(queue: &mut EffectQueue, victim: &Actor) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(None, Some(victim), victim.position),
            victim_name: victim.name.clone(),
        })
    }
}

impl Deferred for Infestation {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(player) = ctx.living(ctx.world.player_id()).map(|p| p.id) else {
            return skip(EffectKind::Infestation, "no player to serve");
        };
        let template = ctx
            .config
            .infestation
            .clone()
            .with_faction(Faction::Friendly)
            .summoned_by(player, Some(ctx.config.infestation_duration));

        if ctx.spawn_near(&template, self.origin.position).is_some() {
            ctx.world.message(format!(
                "A {} emerges from the body of {}!",
                template.name, self.victim_name
            ));
        }
    }
}

/// An undead raised from a corpse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedUndead {
    pub origin: Origin,
    pub template: GenerationTemplate,
    /// Who did the raising, for blame notes.
    pub agent: String,
    /// Overrides the template's level when non-zero.
    pub experience_level: u8,
    pub message: Option<String>,
}

impl DerivedUndead {
    /// Raise `template` at `position`.
    pub fn schedule(
        queue: &mut EffectQueue,
        position: Coord,
        template: GenerationTemplate,
        agent: impl Into<String>,
        experience_level: u8,
        message: Option<String>,
    ) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::at(position),
            template,
            agent: agent.into(),
            experience_level,
            message,
        })
    }
}

impl Deferred for DerivedUndead {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let mut template = self.template;
        if self.experience_level != 0 {
            template = template.with_experience_level(self.experience_level);
        }
        let Some(id) = ctx.spawn_near(&template, self.origin.position) else {
            return;
        };
        if let Some(undead) = ctx.world.actor_mut(id) {
            undead.blame.push(format!("animated by {}", self.agent));
        }
        if let Some(text) = self.message {
            ctx.world.message(text);
        }
    }
}

/// A weapon spirit materialising next to its owner's target and striking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectralWeapon {
    pub origin: Origin,
}

impl SpectralWeapon {
    /// Have `attacker`'s weapon spirit strike `defender`.
    pub fn schedule(queue: &mut EffectQueue, attacker: &Actor, defender: &Actor) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(Some(attacker), Some(defender), defender.position),
        })
    }

    fn find_spirit(ctx: &FireContext<'_>, owner: ActorId, defender: ActorId) -> Option<ActorId> {
        ctx.world
            .summons_of(owner)
            .filter(|&id| id != defender)
            .find(|&id| {
                ctx.world.actor(id).is_some_and(|a| {
                    a.species == ctx.config.spectral_weapon.species && a.is_alive()
                })
            })
    }
}

impl Deferred for SpectralWeapon {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(attacker) = ctx.living(self.origin.attacker) else {
            return skip(EffectKind::SpectralWeapon, "attacker gone");
        };
        let (owner, faction) = (attacker.id, attacker.effective_faction());
        let Some(defender) = ctx.living(self.origin.defender) else {
            return skip(EffectKind::SpectralWeapon, "defender gone");
        };
        let (target, target_pos) = (defender.id, defender.position);

        let spirit = match Self::find_spirit(ctx, owner, target) {
            Some(spirit) => {
                let adjacent = ctx
                    .world
                    .actor(spirit)
                    .is_some_and(|s| s.position.is_adjacent(target_pos));
                if !adjacent {
                    let Some(to) = ctx.world.find_free_near(target_pos, 1) else {
                        return skip(EffectKind::SpectralWeapon, "no room by target");
                    };
                    if !ctx.relocate(spirit, to) {
                        return;
                    }
                }
                spirit
            }
            None => {
                let Some(to) = ctx.world.find_free_near(target_pos, 1) else {
                    return skip(EffectKind::SpectralWeapon, "no room by target");
                };
                let template = ctx
                    .config
                    .spectral_weapon
                    .clone()
                    .with_faction(faction)
                    .summoned_by(owner, Some(ctx.config.spectral_weapon_duration))
                    .with_foe(Some(target));
                match ctx.world.spawn(&template, to) {
                    Ok(id) => id,
                    Err(err) => {
                        debug!(error = %err, "spectral weapon failed to appear");
                        return;
                    }
                }
            }
        };

        let amount = ctx.world.rng.roll(ctx.config.spectral_weapon_damage);
        ctx.world.message("The spectral weapon strikes!");
        ctx.strike(target, Hit::from(Some(spirit), amount));
    }
}
