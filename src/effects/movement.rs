//! Effects that move actors around.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Actor, ActorId, Coord};
use crate::queue::{EffectQueue, Scheduled};
use crate::rules::Relocation;

use super::context::{skip, FireContext};
use super::effect::{Deferred, EffectKind, Origin};

/// An attacker stepping into the cell its target was knocked out of.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrampleFollow {
    pub origin: Origin,
}

impl TrampleFollow {
    /// Have `attacker` follow into `vacated`.
    pub fn schedule(queue: &mut EffectQueue, attacker: &Actor, vacated: Coord) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(Some(attacker), None, vacated),
        })
    }
}

impl Deferred for TrampleFollow {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(attacker) = ctx.living(self.origin.attacker) else {
            return skip(EffectKind::TrampleFollow, "attacker gone");
        };
        if attacker.stationary {
            return;
        }
        let id = attacker.id;
        let to = self.origin.position;
        if ctx.world.is_free(to) {
            ctx.relocate(id, to);
        }
    }
}

/// A short-range hop, towards another actor if it is still around.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blink {
    pub origin: Origin,
}

impl Blink {
    /// Blink `blinker`, optionally towards `other`.
    pub fn schedule(queue: &mut EffectQueue, blinker: &Actor, other: Option<&Actor>) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(Some(blinker), other, blinker.position),
        })
    }
}

impl Deferred for Blink {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(blinker) = ctx.living(self.origin.attacker) else {
            return skip(EffectKind::Blink, "blinker gone");
        };
        let (id, from, name) = (blinker.id, blinker.position, blinker.name.clone());
        let near = ctx.living(self.origin.defender).map(|a| a.position);

        let Some(to) = ctx
            .rules
            .relocation_target(ctx.world, from, Relocation::Blink { near })
        else {
            return skip(EffectKind::Blink, "nowhere to go");
        };
        if ctx.relocate(id, to) {
            ctx.world.message(format!("{} blinks.", name));
        }
    }
}

/// Relocation anywhere on the level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleport {
    pub origin: Origin,
}

impl Teleport {
    /// Teleport `defender` away.
    pub fn schedule(queue: &mut EffectQueue, defender: &Actor) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(None, Some(defender), defender.position),
        })
    }
}

impl Deferred for Teleport {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(defender) = ctx.living(self.origin.defender) else {
            return skip(EffectKind::Teleport, "defender gone");
        };
        let (id, from, name) = (defender.id, defender.position, defender.name.clone());

        let Some(to) = ctx
            .rules
            .relocation_target(ctx.world, from, Relocation::Teleport)
        else {
            return skip(EffectKind::Teleport, "nowhere to go");
        };
        if ctx.relocate(id, to) {
            ctx.world.message(format!("{} vanishes!", name));
        }
    }
}

/// Linked masses pulling together into one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarcursedMerge {
    pub origin: Origin,
}

impl StarcursedMerge {
    /// Merge the kin adjacent to `merger` into it.
    pub fn schedule(queue: &mut EffectQueue, merger: &Actor) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(None, Some(merger), merger.position),
        })
    }
}

impl Deferred for StarcursedMerge {
    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(merger) = ctx.living(self.origin.defender) else {
            return skip(EffectKind::StarcursedMerge, "merger gone");
        };
        let (id, pos, species, faction) =
            (merger.id, merger.position, merger.species, merger.faction);
        let name = merger.name.clone();

        let kin: SmallVec<[ActorId; 8]> = pos
            .neighbours()
            .filter_map(|c| ctx.world.actor_at(c))
            .filter(|&other| {
                ctx.world.actor(other).is_some_and(|a| {
                    a.is_alive() && a.species == species && a.faction == faction
                })
            })
            .collect();
        if kin.is_empty() {
            return;
        }

        let (mut hp, mut max_hp) = (0i32, 0i32);
        for other in kin {
            if let Some(absorbed) = ctx.world.remove(other) {
                hp = hp.saturating_add(absorbed.hp);
                max_hp = max_hp.saturating_add(absorbed.max_hp);
            }
        }
        if let Some(merger) = ctx.world.actor_mut(id) {
            merger.hp = merger.hp.saturating_add(hp);
            merger.max_hp = merger.max_hp.saturating_add(max_hp);
        }
        ctx.world.message(format!("{} merges with its kin.", name));
    }
}
