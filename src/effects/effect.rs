//! Effect record definitions.
//!
//! A final effect is a side effect of combat that must not happen while
//! the triggering action is still resolving. Each kind is a plain struct
//! implementing [`Deferred`]; [`FinalEffect`] is the closed set of them
//! and is what the queue stores.
//!
//! ## Record Layout
//!
//! Every record embeds an [`Origin`]:
//! - `attacker` / `defender`: stable IDs, resolved only at fire time
//! - `position`: a map cell, for effects that outlive their actors
//!
//! Everything else is captured by value when the effect is scheduled.
//! After that a record only changes by merging with a sibling.

use serde::{Deserialize, Serialize};

use crate::core::{Actor, ActorId, Coord};

use super::combat::{Anguish, DeferredDamage, Discharge, MirrorDamage, Retribution};
use super::context::FireContext;
use super::death::{AvoidedDeath, DeathCurse, SummonDismissal};
use super::level::{BloodPool, DelayedAction, Explosion};
use super::movement::{Blink, StarcursedMerge, Teleport, TrampleFollow};
use super::spawn::{CloneOnDeath, DerivedUndead, Infestation, Revival, SpawnOnHit, SpectralWeapon};

/// Who and where an effect is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub attacker: Option<ActorId>,
    pub defender: Option<ActorId>,
    pub position: Coord,
}

impl Origin {
    /// Reduce actor references to IDs.
    #[must_use]
    pub fn new(attacker: Option<&Actor>, defender: Option<&Actor>, position: Coord) -> Self {
        Self {
            attacker: attacker.map(|a| a.id),
            defender: defender.map(|d| d.id),
            position,
        }
    }

    /// An origin with no actors.
    #[must_use]
    pub const fn at(position: Coord) -> Self {
        Self {
            attacker: None,
            defender: None,
            position,
        }
    }

    /// Check if two origins name the same attacker and defender.
    #[must_use]
    pub fn same_pair(&self, other: &Origin) -> bool {
        self.attacker == other.attacker && self.defender == other.defender
    }
}

/// Behaviour of a single effect kind.
///
/// ## Implementation Notes
///
/// - `mergeable`: Must be symmetric. Defaults to never merging.
/// - `merge`: Only called after `mergeable` returned true.
/// - `fire`: Resolve IDs through the context first; a missing actor means
///   the effect quietly does nothing.
pub trait Deferred: Into<FinalEffect> {
    /// Check if `other` can be folded into this record.
    fn mergeable(&self, _other: &Self) -> bool {
        false
    }

    /// Fold `other` into this record.
    fn merge(&mut self, _other: Self) {}

    /// Carry out the effect.
    fn fire(self, ctx: &mut FireContext<'_>);
}

macro_rules! final_effects {
    ($($variant:ident),* $(,)?) => {
        /// A pending final effect.
        #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
        pub enum FinalEffect {
            $($variant($variant),)*
        }

        /// Discriminant of a [`FinalEffect`], for logging.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum EffectKind {
            $($variant,)*
        }

        impl FinalEffect {
            /// Which kind of effect this is.
            #[must_use]
            pub fn kind(&self) -> EffectKind {
                match self {
                    $(Self::$variant(_) => EffectKind::$variant,)*
                }
            }

            /// Actors and position the effect refers to.
            #[must_use]
            pub fn origin(&self) -> &Origin {
                match self {
                    $(Self::$variant(e) => &e.origin,)*
                }
            }

            /// Check if `other` can be folded into this record.
            ///
            /// Records of different kinds never merge.
            #[must_use]
            pub fn mergeable(&self, other: &FinalEffect) -> bool {
                match (self, other) {
                    $((Self::$variant(a), Self::$variant(b)) => a.mergeable(b),)*
                    _ => false,
                }
            }

            pub(crate) fn merge(&mut self, other: FinalEffect) {
                match (self, other) {
                    $((Self::$variant(a), Self::$variant(b)) => a.merge(b),)*
                    (this, other) => debug_assert!(
                        false,
                        "cannot merge {} into {}",
                        other.kind(),
                        this.kind()
                    ),
                }
            }

            pub(crate) fn fire(self, ctx: &mut FireContext<'_>) {
                match self {
                    $(Self::$variant(e) => e.fire(ctx),)*
                }
            }
        }

        $(
            impl From<$variant> for FinalEffect {
                fn from(effect: $variant) -> Self {
                    Self::$variant(effect)
                }
            }
        )*
    };
}

final_effects! {
    MirrorDamage,
    Anguish,
    Retribution,
    TrampleFollow,
    Blink,
    Teleport,
    SpawnOnHit,
    BloodPool,
    DeferredDamage,
    StarcursedMerge,
    Discharge,
    Explosion,
    DelayedAction,
    CloneOnDeath,
    Revival,
    AvoidedDeath,
    Infestation,
    DerivedUndead,
    DeathCurse,
    SummonDismissal,
    SpectralWeapon,
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
