//! The context an effect fires in.

use tracing::{debug, warn};

use crate::core::{
    Actor, ActorId, Coord, EffectConfig, GenerationTemplate, Hit, HurtOutcome, World,
};
use crate::queue::EffectQueue;
use crate::rules::CombatRules;

use super::death::SummonDismissal;
use super::effect::EffectKind;
use super::level::BloodPool;

/// Everything a firing effect may touch.
///
/// `queue` is the fresh queue left behind by the drain: effects scheduled
/// here fire on the next drain, never the current one.
pub struct FireContext<'a> {
    pub world: &'a mut World,
    pub queue: &'a mut EffectQueue,
    pub rules: &'a dyn CombatRules,
    pub config: &'a EffectConfig,
}

impl<'a> FireContext<'a> {
    pub(crate) fn new(
        world: &'a mut World,
        queue: &'a mut EffectQueue,
        rules: &'a dyn CombatRules,
        config: &'a EffectConfig,
    ) -> Self {
        Self {
            world,
            queue,
            rules,
            config,
        }
    }

    /// Resolve an ID to an actor that is present and alive.
    #[must_use]
    pub fn living(&self, id: Option<ActorId>) -> Option<&Actor> {
        self.world.resolve(id).filter(|a| a.is_alive())
    }

    /// Damage an actor, handling the consequences of a kill.
    ///
    /// World errors are logged and swallowed.
    pub fn strike(&mut self, target: ActorId, hit: Hit) -> Option<HurtOutcome> {
        match self.world.hurt(target, hit) {
            Ok(HurtOutcome::Killed(corpse)) => {
                debug!(victim = %corpse.id, killer = ?corpse.killer, "effect killed actor");
                if self.config.bleed_on_kill && corpse.bleeds {
                    BloodPool::schedule_at(
                        self.queue,
                        corpse.species,
                        corpse.position,
                        self.config.kill_blood,
                    );
                }
                if self.world.summons_of(corpse.id).next().is_some() {
                    SummonDismissal::schedule_for(self.queue, corpse.id, corpse.position);
                }
                Some(HurtOutcome::Killed(corpse))
            }
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(%target, error = %err, "dropped effect damage");
                None
            }
        }
    }

    /// Create an actor near a cell, within the configured search radius.
    pub fn spawn_near(&mut self, template: &GenerationTemplate, center: Coord) -> Option<ActorId> {
        match self
            .world
            .spawn_near(template, center, self.config.spawn_search_radius)
        {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(template = %template.name, error = %err, "dropped effect spawn");
                None
            }
        }
    }

    /// Move an actor, logging failures.
    pub fn relocate(&mut self, id: ActorId, to: Coord) -> bool {
        match self.world.move_actor(id, to) {
            Ok(()) => true,
            Err(err) => {
                warn!(actor = %id, error = %err, "dropped effect move");
                false
            }
        }
    }
}

/// Log an effect that found nothing to act on.
pub(crate) fn skip(kind: EffectKind, reason: &str) {
    debug!(effect = %kind, reason, "effect skipped");
}
