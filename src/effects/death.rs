//! Effects tied to an actor's death, or to it narrowly not dying.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Actor, ActorId, Coord, Dice, Faction, Hit, Status};
use crate::queue::{EffectQueue, Scheduled};

use super::context::{skip, FireContext};
use super::effect::{Deferred, EffectKind, Origin};

/// Restores an actor that was provisionally killed.
///
/// Scheduling negates the actor's hp on the spot, so anything else that
/// resolves this turn sees a dead actor. The drain puts the hp back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvoidedDeath {
    pub origin: Origin,
    pub hp: i32,
}

impl AvoidedDeath {
    /// Mark `actor` dead until the next drain.
    pub fn schedule(queue: &mut EffectQueue, actor: &mut Actor) -> Scheduled {
        let hp = actor.hp;
        actor.hp = -hp;
        queue.schedule(Self {
            origin: Origin::new(None, Some(&*actor), actor.position),
            hp,
        })
    }
}

impl Deferred for AvoidedDeath {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(id) = self.origin.defender else {
            return;
        };
        let Some(actor) = ctx.world.actor_mut(id) else {
            return skip(EffectKind::AvoidedDeath, "actor gone");
        };
        actor.hp = self.hp;
    }
}

/// How an actor died, as far as death curses care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Killer {
    Player,
    Monster,
    /// Traps, clouds, and other things that are not actors.
    NonActor,
    /// Removed by a level reset rather than killed.
    Reset,
    Banished,
}

impl Killer {
    /// Whether a curse can find someone to land on.
    #[must_use]
    pub fn can_be_cursed(self) -> bool {
        matches!(self, Killer::Player | Killer::Monster)
    }
}

/// A dying actor's curse on whoever killed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathCurse {
    pub origin: Origin,
    pub killer: Killer,
    pub power: i32,
    /// The killer was the player's ally; the player takes the curse.
    pub blame_player: bool,
}

impl DeathCurse {
    /// Curse whoever killed `victim`.
    pub fn schedule(
        queue: &mut EffectQueue,
        victim: &Actor,
        attacker: Option<&Actor>,
        killer: Killer,
        power: i32,
    ) -> Scheduled {
        let blame_player = killer == Killer::Monster
            && attacker.is_some_and(|a| !a.is_player() && a.faction == Faction::Friendly);
        queue.schedule(Self {
            origin: Origin::new(attacker, Some(victim), victim.position),
            killer,
            power,
            blame_player,
        })
    }

    /// Damage dice for a given power.
    #[must_use]
    pub fn dice(power: i32) -> Dice {
        Dice::new(2, (power.max(0) / 2 + 1) as u32)
    }
}

impl Deferred for DeathCurse {
    fn fire(self, ctx: &mut FireContext<'_>) {
        if self.power <= 0 || !self.killer.can_be_cursed() {
            return skip(EffectKind::DeathCurse, "nobody to curse");
        }
        let target = if self.killer == Killer::Player || self.blame_player {
            ctx.world.player_id()
        } else {
            self.origin.attacker
        };
        let Some(victim) = ctx.living(target) else {
            return skip(EffectKind::DeathCurse, "curse target gone");
        };
        let id = victim.id;
        let text = if victim.is_player() {
            "You are struck by a death curse!".to_string()
        } else {
            format!("{} is struck by a death curse!", victim.name)
        };

        ctx.world.message(text);
        if let Some(victim) = ctx.world.actor_mut(id) {
            victim.apply_status(Status::Drained, self.power as u32);
        }
        let amount = ctx.world.rng.roll(Self::dice(self.power));
        ctx.strike(
            id,
            Hit {
                amount,
                source: self.origin.defender,
                attributed: false,
            },
        );
    }
}

/// Temporary summons leaving when their owner does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummonDismissal {
    pub origin: Origin,
}

impl SummonDismissal {
    /// Dismiss the temporary summons of `owner`.
    pub fn schedule(queue: &mut EffectQueue, owner: &Actor) -> Scheduled {
        Self::schedule_for(queue, owner.id, owner.position)
    }

    /// Dismiss by ID, for owners that are already gone.
    pub fn schedule_for(queue: &mut EffectQueue, owner: ActorId, position: Coord) -> Scheduled {
        queue.schedule(Self {
            origin: Origin {
                attacker: None,
                defender: Some(owner),
                position,
            },
        })
    }
}

impl Deferred for SummonDismissal {
    fn mergeable(&self, other: &Self) -> bool {
        self.origin.defender == other.origin.defender
    }

    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(owner) = self.origin.defender else {
            return;
        };
        // Revived in the meantime.
        if ctx.living(Some(owner)).is_some() {
            return skip(EffectKind::SummonDismissal, "owner alive");
        }

        let summons: SmallVec<[ActorId; 8]> = ctx
            .world
            .actors()
            .filter(|a| a.summoner == Some(owner) && a.is_temporary_summon())
            .map(|a| a.id)
            .collect();
        for id in summons {
            if let Some(summon) = ctx.world.remove(id) {
                ctx.world.message(format!("{} vanishes.", summon.name));
            }
        }
    }
}
