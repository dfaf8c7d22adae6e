//! Effect queue and dispatcher.
//!
//! Combat code schedules final effects while an action is resolving; the
//! game loop drains the queue once the action and its siblings are done.
//!
//! ## Example Usage
//!
//! ```
//! use deferred_effects::core::{Coord, EffectConfig, SpeciesId, World};
//! use deferred_effects::effects::BloodPool;
//! use deferred_effects::queue::EffectQueue;
//! use deferred_effects::rules::StandardRules;
//!
//! let mut world = World::new(8, 8, 42);
//! let mut queue = EffectQueue::new();
//!
//! // Two spills on the same cell become one entry
//! BloodPool::schedule_at(&mut queue, SpeciesId::new(7), Coord::new(3, 4), 2);
//! BloodPool::schedule_at(&mut queue, SpeciesId::new(7), Coord::new(3, 4), 3);
//! assert_eq!(queue.len(), 1);
//!
//! let report = queue.fire_final_effects(&mut world, &StandardRules::default(), &EffectConfig::default());
//! assert_eq!(report.fired, 1);
//! assert_eq!(world.map.blood_at(Coord::new(3, 4)), 5);
//! ```

mod pending;

pub use pending::{DrainReport, EffectQueue, Scheduled};
