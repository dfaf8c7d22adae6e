//! Property tests for the effect queue.

use proptest::prelude::*;

use deferred_effects::core::{
    ActorId, Coord, Dice, EffectConfig, Faction, GenerationTemplate, SpeciesId, World,
};
use deferred_effects::effects::{
    Anguish, BloodPool, DeferredDamage, Discharge, Explosion, FinalEffect, MirrorDamage, Origin,
    Retribution, SpawnOnHit,
};
use deferred_effects::queue::EffectQueue;
use deferred_effects::rules::{Blast, StandardRules};

// =============================================================================
// Strategy generators
// =============================================================================

/// Blood spills on a small board so that collisions are common.
fn spill_strategy() -> impl Strategy<Value = Vec<(i32, i32, u16, u32)>> {
    prop::collection::vec((0..4i32, 0..4i32, 0..3u16, 1..10u32), 0..40)
}

fn pair(attacker: u32, defender: u32) -> Origin {
    Origin {
        attacker: Some(ActorId::new(attacker)),
        defender: Some(ActorId::new(defender)),
        position: Coord::new(0, 0),
    }
}

/// One of the variants whose merge sums a payload, keyed on (1, 2).
fn summing(variant: u8, amount: i32) -> FinalEffect {
    let origin = pair(1, 2);
    match variant {
        0 => MirrorDamage { origin, damage: amount }.into(),
        1 => Anguish { origin, damage: amount }.into(),
        2 => Retribution { origin, damage: amount }.into(),
        3 => DeferredDamage {
            origin,
            damage: amount,
            attacker_effects: false,
            fatal: true,
        }
        .into(),
        4 => Discharge {
            origin,
            power: amount,
            faction: Faction::Hostile,
            source_name: "The eel".to_string(),
        }
        .into(),
        5 => SpawnOnHit {
            origin,
            damage: amount,
            template: GenerationTemplate::new("jelly", SpeciesId::new(8), 10),
            faction: Faction::Hostile,
        }
        .into(),
        _ => BloodPool {
            origin: Origin::at(Coord::new(0, 0)),
            species: SpeciesId::new(1),
            amount: amount.unsigned_abs(),
        }
        .into(),
    }
}

/// The summed payload of a variant built by [`summing`].
fn payload(effect: &FinalEffect) -> i64 {
    match effect {
        FinalEffect::MirrorDamage(e) => e.damage.into(),
        FinalEffect::Anguish(e) => e.damage.into(),
        FinalEffect::Retribution(e) => e.damage.into(),
        FinalEffect::DeferredDamage(e) => e.damage.into(),
        FinalEffect::Discharge(e) => e.power.into(),
        FinalEffect::SpawnOnHit(e) => e.damage.into(),
        FinalEffect::BloodPool(e) => e.amount.into(),
        _ => -1,
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// N mergeable schedules collapse into one entry carrying the sum.
    #[test]
    fn prop_same_key_merges_to_sum(
        variant in 0..7u8,
        damages in prop::collection::vec(1..50i32, 1..20),
    ) {
        let mut queue = EffectQueue::new();
        for &d in &damages {
            queue.schedule(summing(variant, d));
        }

        prop_assert_eq!(queue.len(), 1);
        let total: i64 = damages.iter().map(|&d| i64::from(d)).sum();
        prop_assert_eq!(payload(&queue.pending()[0]), total);
    }

    /// Summing merges clamp at the payload's maximum instead of overflowing.
    #[test]
    fn prop_merge_never_overflows(
        variant in 0..6u8,
        damages in prop::collection::vec(i32::MAX / 2 + 1..=i32::MAX, 2..8),
    ) {
        let mut queue = EffectQueue::new();
        for &d in &damages {
            queue.schedule(summing(variant, d));
        }

        prop_assert_eq!(queue.len(), 1);
        prop_assert_eq!(payload(&queue.pending()[0]), i64::from(i32::MAX));
    }

    /// A different attacker never merges into an existing entry.
    #[test]
    fn prop_different_attacker_stays_separate(variant in 0..6u8, damage in 1..50i32) {
        let mut queue = EffectQueue::new();
        queue.schedule(summing(variant, damage));
        let mut other = summing(variant, damage);
        match &mut other {
            FinalEffect::MirrorDamage(e) => e.origin = pair(3, 2),
            FinalEffect::Anguish(e) => e.origin = pair(3, 2),
            FinalEffect::Retribution(e) => e.origin = pair(3, 2),
            FinalEffect::DeferredDamage(e) => e.origin = pair(3, 2),
            FinalEffect::Discharge(e) => e.origin = pair(3, 2),
            FinalEffect::SpawnOnHit(e) => e.origin = pair(3, 2),
            _ => {}
        }

        prop_assert!(!queue.schedule(other).is_merged());
        prop_assert_eq!(queue.len(), 2);
    }

    /// Explosions never merge: one entry per schedule.
    #[test]
    fn prop_explosions_stay_separate(count in 0..20usize) {
        let mut queue = EffectQueue::new();
        let blast = Blast::new(Coord::new(1, 1), 1, Dice::new(1, 4));
        for _ in 0..count {
            Explosion::new(blast).schedule(&mut queue);
        }
        prop_assert_eq!(queue.len(), count);
    }

    /// One entry per distinct (cell, species), in first-seen order, and
    /// the map ends up with exactly the blood that was spilled.
    #[test]
    fn prop_blood_merges_by_key(spills in spill_strategy()) {
        let mut world = World::new(4, 4, 42);
        let mut queue = EffectQueue::new();
        let mut keys: Vec<(Coord, SpeciesId)> = Vec::new();

        for &(x, y, species, amount) in &spills {
            let key = (Coord::new(x, y), SpeciesId::new(species));
            if !keys.contains(&key) {
                keys.push(key);
            }
            BloodPool::schedule_at(&mut queue, key.1, key.0, amount);
        }

        let order: Vec<_> = queue
            .pending()
            .iter()
            .map(|e| match e {
                FinalEffect::BloodPool(p) => (p.origin.position, p.species),
                _ => (Coord::new(-1, -1), SpeciesId::new(0)),
            })
            .collect();
        prop_assert_eq!(&order, &keys);

        let report = queue.fire_final_effects(&mut world, &StandardRules::default(), &EffectConfig::default());
        prop_assert_eq!(report.fired, keys.len());
        prop_assert!(queue.is_empty());

        let total: u32 = world.map.coords().map(|c| world.map.blood_at(c)).sum();
        prop_assert_eq!(total, spills.iter().map(|s| s.3).sum::<u32>());
    }

    /// Draining twice never fires anything the second time.
    #[test]
    fn prop_second_drain_is_noop(spills in spill_strategy()) {
        let mut world = World::new(4, 4, 42);
        let mut queue = EffectQueue::new();
        for &(x, y, species, amount) in &spills {
            BloodPool::schedule_at(&mut queue, SpeciesId::new(species), Coord::new(x, y), amount);
        }

        let rules = StandardRules::default();
        let config = EffectConfig::default();
        queue.fire_final_effects(&mut world, &rules, &config);
        let second = queue.fire_final_effects(&mut world, &rules, &config);

        prop_assert!(second.is_empty());
    }
}
