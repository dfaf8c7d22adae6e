//! Combat rules trait for game implementations.
//!
//! Games implement `CombatRules` to define:
//! - Which cells a blast covers
//! - Where blinking and teleporting actors land
//!
//! Deferred effects call into `CombatRules` but never hardcode geometry
//! beyond the defaults.

pub mod engine;

pub use engine::{Blast, CombatRules, Relocation, StandardRules};
