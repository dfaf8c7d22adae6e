//! Effects on the level itself: terrain decorations, blasts, and
//! level-wide state changes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::core::{Actor, ActorId, Coord, Hit, SpeciesId, WorldAction};
use crate::queue::{EffectQueue, Scheduled};
use crate::rules::Blast;

use super::context::{skip, FireContext};
use super::effect::{Deferred, EffectKind, Origin};

/// Blood spilled onto a cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPool {
    pub origin: Origin,
    pub species: SpeciesId,
    pub amount: u32,
}

impl BloodPool {
    /// Spill `actor`'s blood where it stands.
    pub fn schedule(queue: &mut EffectQueue, actor: &Actor, amount: u32) -> Scheduled {
        Self::schedule_at(queue, actor.species, actor.position, amount)
    }

    /// Spill blood of `species` at `position`.
    pub fn schedule_at(
        queue: &mut EffectQueue,
        species: SpeciesId,
        position: Coord,
        amount: u32,
    ) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::at(position),
            species,
            amount,
        })
    }
}

impl Deferred for BloodPool {
    fn mergeable(&self, other: &Self) -> bool {
        self.origin.position == other.origin.position && self.species == other.species
    }

    fn merge(&mut self, other: Self) {
        self.amount = self.amount.saturating_add(other.amount);
    }

    fn fire(self, ctx: &mut FireContext<'_>) {
        if let Err(err) = ctx
            .world
            .bleed(self.origin.position, self.species, self.amount)
        {
            warn!(error = %err, "dropped blood pool");
        }
    }
}

/// A blast detonating after the current action.
///
/// Explosions never merge: two blasts on the same turn go off twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub origin: Origin,
    pub blast: Blast,
    pub boom_message: Option<String>,
    /// Shown instead of the blast when the centre is in a sanctuary.
    pub sanctuary_message: Option<String>,
    /// Set off by an inner flame; the flame's caster gets the credit.
    pub inner_flame: bool,
    pub flame_agent: Option<ActorId>,
}

impl Explosion {
    /// Prepare an explosion. Call [`Explosion::schedule`] to queue it.
    #[must_use]
    pub fn new(blast: Blast) -> Self {
        Self {
            origin: Origin {
                attacker: blast.source,
                defender: None,
                position: blast.center,
            },
            blast,
            boom_message: None,
            sanctuary_message: None,
            inner_flame: false,
            flame_agent: None,
        }
    }

    /// Set the message shown when the blast goes off (builder pattern).
    #[must_use]
    pub fn with_boom_message(mut self, message: impl Into<String>) -> Self {
        self.boom_message = Some(message.into());
        self
    }

    /// Set the message shown when sanctuary stops the blast (builder pattern).
    #[must_use]
    pub fn with_sanctuary_message(mut self, message: impl Into<String>) -> Self {
        self.sanctuary_message = Some(message.into());
        self
    }

    /// Credit the blast to whoever lit the inner flame (builder pattern).
    #[must_use]
    pub fn inner_flame(mut self, agent: Option<&Actor>) -> Self {
        self.inner_flame = true;
        self.flame_agent = agent.map(|a| a.id);
        self
    }

    /// Queue the explosion.
    pub fn schedule(self, queue: &mut EffectQueue) -> Scheduled {
        queue.schedule(self)
    }
}

impl Deferred for Explosion {
    fn fire(self, ctx: &mut FireContext<'_>) {
        if ctx.world.map.is_sanctuary(self.blast.center) {
            if let Some(text) = self.sanctuary_message {
                ctx.world.message(text);
            }
            return skip(EffectKind::Explosion, "sanctuary");
        }
        if let Some(text) = self.boom_message {
            ctx.world.message(text);
        }

        let area = ctx.rules.blast_area(&*ctx.world, &self.blast);
        let victims: SmallVec<[ActorId; 8]> = area
            .into_iter()
            .filter_map(|c| ctx.world.actor_at(c))
            .filter(|&id| ctx.world.actor(id).is_some_and(|a| a.is_alive()))
            .collect();

        let source = if self.inner_flame {
            self.flame_agent
        } else {
            self.blast.source
        };
        for victim in victims {
            let amount = ctx.world.rng.roll(self.blast.damage);
            ctx.strike(victim, Hit::from(source, amount));
        }
    }
}

/// What set off a [`DelayedAction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTrigger {
    #[default]
    Generic,
    /// A transformer died; the player's own transformation ends as well.
    TransformerDeath,
}

/// A level-wide state change, applied after an optional message.
///
/// Lands at drain time, i.e. after the rest of the current tick. Some
/// callers would rather it happened later still; that is not supported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedAction {
    pub origin: Origin,
    pub action: WorldAction,
    pub final_message: Option<String>,
    pub trigger: ActionTrigger,
}

impl DelayedAction {
    /// Apply `action` to the level after the current tick.
    pub fn schedule(
        queue: &mut EffectQueue,
        action: WorldAction,
        final_message: Option<String>,
        trigger: ActionTrigger,
    ) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::at(Coord::default()),
            action,
            final_message,
            trigger,
        })
    }
}

impl Deferred for DelayedAction {
    fn fire(self, ctx: &mut FireContext<'_>) {
        if let Some(text) = self.final_message {
            ctx.world.message(text);
        }
        ctx.world.apply_world_action(self.action);

        if self.trigger == ActionTrigger::TransformerDeath {
            let Some(id) = ctx.world.player_id() else {
                return;
            };
            let reverted = ctx.world.actor_mut(id).is_some_and(|player| {
                match player.transformed_from.take() {
                    Some(original) => {
                        player.species = original;
                        true
                    }
                    None => false,
                }
            });
            if reverted {
                ctx.world.message("Your transformation ends.");
            }
        }
    }
}
