//! Damage-dealing effects.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Actor, ActorId, Dice, Faction, Hit, Status};
use crate::queue::{EffectQueue, Scheduled};

use super::context::{skip, FireContext};
use super::effect::{Deferred, EffectKind, Origin};

/// Retribution power above which the attacker is paralysed.
const RETRIBUTION_PARALYSE: i32 = 30;

/// Retribution power above which the attacker is slowed.
const RETRIBUTION_SLOW: i32 = 20;

/// Damage reflected back at whoever dealt it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorDamage {
    pub origin: Origin,
    pub damage: i32,
}

impl MirrorDamage {
    /// Reflect `damage` dealt by `attacker` to `defender`.
    pub fn schedule(
        queue: &mut EffectQueue,
        attacker: &Actor,
        defender: &Actor,
        damage: i32,
    ) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(Some(attacker), Some(defender), defender.position),
            damage,
        })
    }
}

impl Deferred for MirrorDamage {
    fn mergeable(&self, other: &Self) -> bool {
        self.origin.same_pair(&other.origin)
    }

    fn merge(&mut self, other: Self) {
        self.damage = self.damage.saturating_add(other.damage);
    }

    fn fire(self, ctx: &mut FireContext<'_>) {
        // The defender may be dead by now; its damage still comes back.
        let Some(attacker) = ctx.living(self.origin.attacker) else {
            return skip(EffectKind::MirrorDamage, "attacker gone");
        };
        if Some(attacker.id) == self.origin.defender {
            return skip(EffectKind::MirrorDamage, "self-inflicted");
        }
        let id = attacker.id;
        let text = if attacker.is_player() {
            "Your damage is reflected back at you!".to_string()
        } else {
            format!("{} suffers a backlash!", attacker.name)
        };

        ctx.world.message(text);
        ctx.strike(id, Hit::from(self.origin.defender, self.damage));
    }
}

/// Self-inflicted damage from a tormented conscience.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anguish {
    pub origin: Origin,
    pub damage: i32,
}

impl Anguish {
    /// Make `attacker` suffer twice the `damage` it dealt.
    pub fn schedule(queue: &mut EffectQueue, attacker: &Actor, damage: i32) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(Some(attacker), None, attacker.position),
            damage: damage.saturating_mul(2),
        })
    }
}

impl Deferred for Anguish {
    fn mergeable(&self, other: &Self) -> bool {
        self.origin.attacker == other.origin.attacker
    }

    fn merge(&mut self, other: Self) {
        self.damage = self.damage.saturating_add(other.damage);
    }

    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(attacker) = ctx.living(self.origin.attacker) else {
            return skip(EffectKind::Anguish, "attacker gone");
        };
        let id = attacker.id;
        let text = format!("{} is wracked by anguish!", attacker.name);

        ctx.world.message(text);
        ctx.strike(id, Hit::from(Some(id), self.damage));
    }
}

/// Divine punishment of whoever hurt the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retribution {
    pub origin: Origin,
    pub damage: i32,
}

impl Retribution {
    /// Punish `attacker` for dealing `damage` to `defender`.
    pub fn schedule(
        queue: &mut EffectQueue,
        attacker: &Actor,
        defender: &Actor,
        damage: i32,
    ) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(Some(attacker), Some(defender), attacker.position),
            damage,
        })
    }
}

impl Deferred for Retribution {
    fn mergeable(&self, other: &Self) -> bool {
        self.origin.same_pair(&other.origin)
    }

    fn merge(&mut self, other: Self) {
        self.damage = self.damage.saturating_add(other.damage);
    }

    fn fire(self, ctx: &mut FireContext<'_>) {
        if !ctx
            .world
            .resolve(self.origin.defender)
            .is_some_and(|d| d.is_player())
        {
            return skip(EffectKind::Retribution, "defender is not the player");
        }
        let Some(attacker) = ctx.living(self.origin.attacker) else {
            return skip(EffectKind::Retribution, "attacker gone");
        };
        let id = attacker.id;
        let name = attacker.name.clone();

        let power = self
            .damage
            .saturating_add(ctx.world.rng.gen_range(0..self.damage));
        if power > RETRIBUTION_PARALYSE {
            ctx.world.message(format!("{} is frozen in place by divine wrath!", name));
            if let Some(actor) = ctx.world.actor_mut(id) {
                actor.apply_status(Status::Paralysed, (power / 10) as u32);
            }
        } else if power > RETRIBUTION_SLOW {
            ctx.world.message(format!("{} is slowed by divine wrath!", name));
            if let Some(actor) = ctx.world.actor_mut(id) {
                actor.apply_status(Status::Slowed, (power / 5) as u32);
            }
        } else {
            ctx.world.message(format!("{} is smitten!", name));
            ctx.strike(id, Hit::from(self.origin.defender, power));
        }
    }
}

/// Damage applied after the current action finishes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredDamage {
    pub origin: Origin,
    pub damage: i32,
    /// Whether the attacker is held responsible (foe and kill credit).
    pub attacker_effects: bool,
    /// Whether the damage may kill. Non-fatal damage leaves 1 hp.
    pub fatal: bool,
}

impl DeferredDamage {
    /// Deal `damage` to `defender` later.
    pub fn schedule(
        queue: &mut EffectQueue,
        attacker: Option<&Actor>,
        defender: &Actor,
        damage: i32,
        attacker_effects: bool,
        fatal: bool,
    ) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(attacker, Some(defender), defender.position),
            damage,
            attacker_effects,
            fatal,
        })
    }
}

impl Deferred for DeferredDamage {
    fn mergeable(&self, other: &Self) -> bool {
        self.origin.same_pair(&other.origin)
    }

    fn merge(&mut self, other: Self) {
        self.damage = self.damage.saturating_add(other.damage);
        self.attacker_effects |= other.attacker_effects;
        self.fatal |= other.fatal;
    }

    fn fire(self, ctx: &mut FireContext<'_>) {
        let Some(defender) = ctx.living(self.origin.defender) else {
            return skip(EffectKind::DeferredDamage, "defender gone");
        };
        let id = defender.id;
        let amount = if self.fatal {
            self.damage
        } else {
            self.damage.min(defender.hp - 1)
        };
        if amount <= 0 {
            return;
        }

        ctx.strike(
            id,
            Hit {
                amount,
                source: self.origin.attacker,
                attributed: self.attacker_effects,
            },
        );
    }
}

/// Electric discharge hitting everyone near the source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discharge {
    pub origin: Origin,
    pub power: i32,
    /// Discharger's faction when scheduled; allies are spared.
    pub faction: Faction,
    /// Name used in the message.
    pub source_name: String,
}

impl Discharge {
    /// Discharge from `discharger`, provoked by `oppressor`.
    pub fn schedule(
        queue: &mut EffectQueue,
        discharger: &Actor,
        oppressor: &Actor,
        power: i32,
        source_name: impl Into<String>,
    ) -> Scheduled {
        queue.schedule(Self {
            origin: Origin::new(Some(discharger), Some(oppressor), discharger.position),
            power,
            faction: discharger.effective_faction(),
            source_name: source_name.into(),
        })
    }

    /// Damage dice for a given power.
    #[must_use]
    pub fn dice(power: i32) -> Dice {
        let sides = power.max(0).saturating_mul(3) / 2;
        Dice::new(3, sides.saturating_add(4).unsigned_abs())
    }
}

impl Deferred for Discharge {
    fn mergeable(&self, other: &Self) -> bool {
        self.origin.attacker == other.origin.attacker
    }

    fn merge(&mut self, other: Self) {
        self.power = self.power.saturating_add(other.power);
    }

    fn fire(self, ctx: &mut FireContext<'_>) {
        if ctx.living(self.origin.defender).is_none() {
            return skip(EffectKind::Discharge, "oppressor gone");
        }
        let range = self.power.clamp(1, ctx.config.discharge_max_range.max(1));
        let center = self.origin.position;

        let targets: SmallVec<[ActorId; 8]> = ctx
            .world
            .actors()
            .filter(|a| {
                a.is_alive()
                    && a.position.distance(center) <= range
                    && a.effective_faction() != self.faction
            })
            .map(|a| a.id)
            .collect();
        if targets.is_empty() {
            return;
        }

        ctx.world.message(format!("{} discharges!", self.source_name));
        let dice = Self::dice(self.power);
        for target in targets {
            let amount = ctx.world.rng.roll(dice);
            ctx.strike(target, Hit::from(self.origin.attacker, amount));
        }
    }
}
