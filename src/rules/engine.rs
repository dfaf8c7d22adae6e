//! Combat rules trait for game implementations.

use serde::{Deserialize, Serialize};

use crate::core::actor::ActorId;
use crate::core::coord::Coord;
use crate::core::rng::Dice;
use crate::core::world::World;

/// An area blast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blast {
    pub center: Coord,
    pub radius: i32,
    pub damage: Dice,
    /// Who set the blast off, if anyone.
    pub source: Option<ActorId>,
}

impl Blast {
    /// Create a blast with no responsible actor.
    #[must_use]
    pub const fn new(center: Coord, radius: i32, damage: Dice) -> Self {
        Self {
            center,
            radius,
            damage,
            source: None,
        }
    }

    /// Set the responsible actor (builder pattern).
    #[must_use]
    pub const fn with_source(mut self, source: ActorId) -> Self {
        self.source = Some(source);
        self
    }
}

/// A relocation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relocation {
    /// Short-range hop, towards `near` if given.
    Blink { near: Option<Coord> },
    /// Anywhere on the level.
    Teleport,
}

/// Geometry and movement decisions.
///
/// Games implement this trait to decide the shapes effects act on.
/// Deferred effects call into it at fire time only.
///
/// ## Implementation Notes
///
/// - `blast_area`: Return only on-map cells. Order is the order actors are hit.
/// - `relocation_target`: Return `None` if there is nowhere to go; the
///   effect then does nothing.
pub trait CombatRules {
    /// Cells affected by a blast.
    ///
    /// Default is the Chebyshev square of `blast.radius`.
    fn blast_area(&self, world: &World, blast: &Blast) -> Vec<Coord> {
        blast
            .center
            .within(blast.radius)
            .filter(|&c| world.map.in_bounds(c))
            .collect()
    }

    /// Pick a destination for an actor standing at `from`.
    fn relocation_target(
        &self,
        world: &mut World,
        from: Coord,
        relocation: Relocation,
    ) -> Option<Coord>;
}

/// Default rules: square blasts, blinks within a fixed range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardRules {
    pub blink_range: i32,
}

impl Default for StandardRules {
    fn default() -> Self {
        Self { blink_range: 4 }
    }
}

impl StandardRules {
    /// Set the blink range (builder pattern).
    #[must_use]
    pub const fn with_blink_range(mut self, range: i32) -> Self {
        self.blink_range = range;
        self
    }
}

impl CombatRules for StandardRules {
    fn relocation_target(
        &self,
        world: &mut World,
        from: Coord,
        relocation: Relocation,
    ) -> Option<Coord> {
        match relocation {
            Relocation::Blink { near: Some(near) } => {
                // As close to the target as possible.
                world.find_free_near(near, self.blink_range.max(1))
            }
            Relocation::Blink { near: None } => {
                let free: Vec<Coord> = from
                    .within(self.blink_range)
                    .filter(|&c| c != from && world.is_free(c))
                    .collect();
                world.rng.choose(&free).copied()
            }
            Relocation::Teleport => world.random_free_cell(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GenerationTemplate, SpeciesId};

    #[test]
    fn test_blast_area_clipped_to_map() {
        let world = World::new(5, 5, 42);
        let rules = StandardRules::default();

        let blast = Blast::new(Coord::new(0, 0), 1, Dice::new(1, 6));
        let area = rules.blast_area(&world, &blast);

        assert_eq!(area.len(), 4);
        assert!(area.contains(&Coord::new(0, 0)));
        assert!(area.contains(&Coord::new(1, 1)));
    }

    #[test]
    fn test_blink_stays_in_range() {
        let mut world = World::new(20, 20, 42);
        let rules = StandardRules::default().with_blink_range(2);
        let from = Coord::new(10, 10);

        for _ in 0..20 {
            let to = rules
                .relocation_target(&mut world, from, Relocation::Blink { near: None })
                .unwrap();
            assert_ne!(to, from);
            assert!(to.distance(from) <= 2);
        }
    }

    #[test]
    fn test_blink_towards_target() {
        let mut world = World::new(20, 20, 42);
        let rules = StandardRules::default();
        let near = Coord::new(3, 3);
        world
            .spawn(&GenerationTemplate::new("rat", SpeciesId(2), 3), near)
            .unwrap();

        let to = rules
            .relocation_target(&mut world, Coord::new(6, 6), Relocation::Blink { near: Some(near) })
            .unwrap();
        assert!(to.is_adjacent(near));
    }

    #[test]
    fn test_teleport_finds_free_cell() {
        let mut world = World::new(3, 1, 42);
        let rules = StandardRules::default();
        let t = GenerationTemplate::new("rat", SpeciesId(2), 3);
        world.spawn(&t, Coord::new(0, 0)).unwrap();
        world.spawn(&t, Coord::new(1, 0)).unwrap();

        let to = rules.relocation_target(&mut world, Coord::new(0, 0), Relocation::Teleport);
        assert_eq!(to, Some(Coord::new(2, 0)));
    }
}
