//! Final effects: combat side effects deferred to the end of the tick.
//!
//! Effects are grouped by what they touch:
//! - `combat`: damage and statuses (mirror damage, anguish, retribution,
//!   deferred damage, discharge)
//! - `movement`: trampling, blinking, teleporting, starcursed merging
//! - `spawn`: minions, clones, revivals, infestation, undead, weapon spirits
//! - `death`: avoided deaths, death curses, summon dismissal
//! - `level`: blood, explosions, level-wide actions
//!
//! ## Design Philosophy
//!
//! Scheduling an effect never touches the world (the one exception being
//! [`AvoidedDeath`], which marks its actor dead on the spot). Records hold
//! [`ActorId`](crate::core::ActorId)s rather than references, so an actor
//! that dies before the drain simply turns its effects into no-ops.

mod combat;
mod context;
mod death;
mod effect;
mod level;
mod movement;
mod spawn;

pub use combat::{Anguish, DeferredDamage, Discharge, MirrorDamage, Retribution};
pub use context::FireContext;
pub use death::{AvoidedDeath, DeathCurse, Killer, SummonDismissal};
pub use effect::{Deferred, EffectKind, FinalEffect, Origin};
pub use level::{ActionTrigger, BloodPool, DelayedAction, Explosion};
pub use movement::{Blink, StarcursedMerge, Teleport, TrampleFollow};
pub use spawn::{CloneOnDeath, DerivedUndead, Infestation, Revival, SpawnOnHit, SpectralWeapon};
