//! Effect queue integration tests.
//!
//! These tests verify merge-on-schedule, drain ordering, and re-entrant
//! scheduling against a real world.

use deferred_effects::core::{
    Coord, Dice, EffectConfig, GenerationTemplate, SpeciesId, World,
};
use deferred_effects::effects::{
    BloodPool, DeferredDamage, Explosion, FinalEffect, MirrorDamage, SummonDismissal,
};
use deferred_effects::queue::{DrainReport, EffectQueue, Scheduled};
use deferred_effects::rules::{Blast, StandardRules};

fn drain(world: &mut World, queue: &mut EffectQueue) -> DrainReport {
    queue.fire_final_effects(world, &StandardRules::default(), &EffectConfig::default())
}

fn orc(hp: i32) -> GenerationTemplate {
    GenerationTemplate::new("orc", SpeciesId::new(3), hp)
}

// =============================================================================
// Merging
// =============================================================================

/// Two reflections of the same pair become one, and fire once.
#[test]
fn test_mirror_damage_merges_and_fires_once() {
    let mut world = World::new(10, 10, 42);
    let player = world.spawn_player("you", 40, Coord::new(1, 1)).unwrap();
    let orc = world.spawn(&orc(40), Coord::new(2, 1)).unwrap();
    let mut queue = EffectQueue::new();

    let first = MirrorDamage::schedule(
        &mut queue,
        world.actor(orc).unwrap(),
        world.actor(player).unwrap(),
        5,
    );
    let second = MirrorDamage::schedule(
        &mut queue,
        world.actor(orc).unwrap(),
        world.actor(player).unwrap(),
        7,
    );

    assert_eq!(first, Scheduled::Queued(0));
    assert_eq!(second, Scheduled::Merged(0));
    assert_eq!(queue.len(), 1);

    let report = drain(&mut world, &mut queue);

    assert_eq!(report.fired, 1);
    assert_eq!(world.actor(orc).unwrap().hp, 28);
    assert_eq!(world.messages().len(), 1);
}

/// Blood on the same cell and species pools into one entry.
#[test]
fn test_blood_pools_merge() {
    let mut world = World::new(10, 10, 42);
    let mut queue = EffectQueue::new();
    let pos = Coord::new(3, 4);

    BloodPool::schedule_at(&mut queue, SpeciesId::new(9), pos, 2);
    BloodPool::schedule_at(&mut queue, SpeciesId::new(9), pos, 3);

    assert_eq!(queue.len(), 1);
    match &queue.pending()[0] {
        FinalEffect::BloodPool(pool) => assert_eq!(pool.amount, 5),
        other => panic!("Expected BloodPool, got {:?}", other),
    }

    drain(&mut world, &mut queue);
    assert_eq!(world.map.blood_at(pos), 5);
}

/// Explosions are never merged, even when identical.
#[test]
fn test_two_explosions_two_entries() {
    let mut world = World::new(10, 10, 42);
    let target = world.spawn(&orc(100), Coord::new(5, 5)).unwrap();
    let mut queue = EffectQueue::new();
    let blast = Blast::new(Coord::new(5, 5), 1, Dice::new(1, 1));

    Explosion::new(blast).schedule(&mut queue);
    Explosion::new(blast).schedule(&mut queue);
    assert_eq!(queue.len(), 2);

    drain(&mut world, &mut queue);
    assert_eq!(world.actor(target).unwrap().hp, 98);
}

/// A merge keeps the slot of the first entry; later entries keep theirs.
#[test]
fn test_merge_keeps_original_slot() {
    let mut queue = EffectQueue::new();
    let a = Coord::new(1, 1);
    let b = Coord::new(2, 2);

    BloodPool::schedule_at(&mut queue, SpeciesId::new(1), a, 1);
    BloodPool::schedule_at(&mut queue, SpeciesId::new(1), b, 1);
    let merged = BloodPool::schedule_at(&mut queue, SpeciesId::new(1), a, 1);

    assert_eq!(merged, Scheduled::Merged(0));
    let positions: Vec<_> = queue.pending().iter().map(|e| e.origin().position).collect();
    assert_eq!(positions, vec![a, b]);
}

// =============================================================================
// Draining
// =============================================================================

/// Effects fire in first-insertion order.
#[test]
fn test_drain_order_is_insertion_order() {
    let mut world = World::new(10, 10, 42);
    let mut queue = EffectQueue::new();

    Explosion::new(Blast::new(Coord::new(1, 1), 0, Dice::new(1, 1)))
        .with_boom_message("first")
        .schedule(&mut queue);
    Explosion::new(Blast::new(Coord::new(8, 8), 0, Dice::new(1, 1)))
        .with_boom_message("second")
        .schedule(&mut queue);
    Explosion::new(Blast::new(Coord::new(1, 1), 0, Dice::new(1, 1)))
        .with_boom_message("third")
        .schedule(&mut queue);

    drain(&mut world, &mut queue);

    assert_eq!(world.messages(), &["first", "second", "third"]);
}

/// A second drain with nothing queued does nothing.
#[test]
fn test_drain_is_idempotent() {
    let mut world = World::new(10, 10, 42);
    let mut queue = EffectQueue::new();
    BloodPool::schedule_at(&mut queue, SpeciesId::new(1), Coord::new(1, 1), 4);

    let first = drain(&mut world, &mut queue);
    let second = drain(&mut world, &mut queue);

    assert_eq!(first.fired, 1);
    assert!(second.is_empty());
    assert_eq!(world.map.blood_at(Coord::new(1, 1)), 4);
}

/// A kill during a drain schedules blood, which waits for the next drain.
#[test]
fn test_reentrant_schedules_wait_for_next_drain() {
    let mut world = World::new(10, 10, 42);
    let victim = world.spawn(&orc(5), Coord::new(4, 4)).unwrap();
    let mut queue = EffectQueue::new();
    DeferredDamage::schedule(&mut queue, None, world.actor(victim).unwrap(), 10, false, true);

    let first = drain(&mut world, &mut queue);

    assert_eq!(first, DrainReport { fired: 1, deferred: 1 });
    assert!(world.was_removed(victim));
    assert_eq!(world.map.blood_at(Coord::new(4, 4)), 0);
    assert_eq!(queue.len(), 1);

    let second = drain(&mut world, &mut queue);

    assert_eq!(second, DrainReport { fired: 1, deferred: 0 });
    assert_eq!(
        world.map.blood_at(Coord::new(4, 4)),
        EffectConfig::default().kill_blood
    );
}

/// Killing a summoner queues a dismissal of its temporary summons.
#[test]
fn test_kill_dismisses_summons_next_drain() {
    let mut world = World::new(10, 10, 42);
    let summoner = world.spawn(&orc(5), Coord::new(4, 4)).unwrap();
    let imp = world
        .spawn(&orc(5).summoned_by(summoner, Some(10)), Coord::new(6, 6))
        .unwrap();
    let mut queue = EffectQueue::new();
    DeferredDamage::schedule(&mut queue, None, world.actor(summoner).unwrap(), 10, false, true);

    drain(&mut world, &mut queue);
    assert!(world.contains(imp));

    drain(&mut world, &mut queue);
    assert!(world.was_removed(imp));
}

/// Effects aimed at a removed actor do nothing.
#[test]
fn test_stale_target_is_noop() {
    let mut world = World::new(10, 10, 42);
    let player = world.spawn_player("you", 40, Coord::new(1, 1)).unwrap();
    let orc = world.spawn(&orc(40), Coord::new(2, 1)).unwrap();
    let mut queue = EffectQueue::new();
    MirrorDamage::schedule(
        &mut queue,
        world.actor(orc).unwrap(),
        world.actor(player).unwrap(),
        5,
    );
    world.remove(orc);

    let report = drain(&mut world, &mut queue);

    assert_eq!(report.fired, 1);
    assert!(world.messages().is_empty());
    assert_eq!(world.actor(player).unwrap().hp, 40);
}

/// Dismissals for the same owner merge; different owners stay apart.
#[test]
fn test_dismissals_merge_per_owner() {
    let mut world = World::new(10, 10, 42);
    let a = world.spawn(&orc(5), Coord::new(1, 1)).unwrap();
    let b = world.spawn(&orc(5), Coord::new(2, 2)).unwrap();
    let mut queue = EffectQueue::new();

    SummonDismissal::schedule(&mut queue, world.actor(a).unwrap());
    SummonDismissal::schedule(&mut queue, world.actor(b).unwrap());
    let again = SummonDismissal::schedule(&mut queue, world.actor(a).unwrap());

    assert!(again.is_merged());
    assert_eq!(queue.len(), 2);
}
