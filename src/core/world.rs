//! The world: actor directory, map, message log.
//!
//! ## Actor Directory
//!
//! Actors live in an arena of slots indexed by `ActorId`. IDs are handed
//! out monotonically starting at 1 and never reused. Removing an actor
//! leaves a tombstone in its slot, so a stale ID keeps resolving to `None`
//! for the rest of the session instead of aliasing a newer actor.
//!
//! ```
//! use deferred_effects::core::{Coord, GenerationTemplate, SpeciesId, World};
//!
//! let mut world = World::new(8, 8, 42);
//! let goblin = GenerationTemplate::new("goblin", SpeciesId::new(1), 10);
//! let id = world.spawn(&goblin, Coord::new(2, 2)).unwrap();
//!
//! assert!(world.actor(id).is_some());
//! world.remove(id);
//! assert!(world.actor(id).is_none());
//! assert!(world.was_removed(id));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, ActorKind, Faction, SpeciesId, Status};
use super::coord::Coord;
use super::error::{WorldError, WorldResult};
use super::map::Map;
use super::rng::{GameRng, GameRngState};
use super::template::GenerationTemplate;

/// An arena slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum Slot {
    Live(Actor),
    Removed,
}

/// A single application of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub amount: i32,
    /// Who dealt the damage, if anyone.
    pub source: Option<ActorId>,
    /// Whether the source gets the consequences of hurting the target:
    /// the target turns on it, and a kill is credited to it.
    pub attributed: bool,
}

impl Hit {
    /// An attributed hit from `source`.
    #[must_use]
    pub const fn from(source: Option<ActorId>, amount: i32) -> Self {
        Self {
            amount,
            source,
            attributed: true,
        }
    }

    /// Damage with no responsible actor.
    #[must_use]
    pub const fn unattributed(amount: i32) -> Self {
        Self {
            amount,
            source: None,
            attributed: false,
        }
    }
}

/// What remains of an actor killed by [`World::hurt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corpse {
    pub id: ActorId,
    pub name: String,
    pub species: SpeciesId,
    pub position: Coord,
    pub bleeds: bool,
    pub killer: Option<ActorId>,
}

/// Outcome of [`World::hurt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HurtOutcome {
    /// Target survived with `remaining` hit points.
    Wounded { remaining: i32 },
    /// Target died and was removed from the directory.
    Killed(Corpse),
}

/// A level-wide state transition.
///
/// Applied to every actor currently present and kept in the world's
/// action log so that actors arriving later can be brought in line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldAction {
    /// Transformed monsters return to their original species.
    RevertTransformations,
    /// Strip a status from every actor of a faction.
    ClearFactionStatus { faction: Faction, status: Status },
}

/// The simulation world seen by deferred effects.
#[derive(Clone, Debug)]
pub struct World {
    slots: Vec<Slot>,
    occupancy: FxHashMap<Coord, ActorId>,
    player: Option<ActorId>,

    /// Terrain and decorations.
    pub map: Map,

    messages: Vec<String>,
    world_actions: Vec<WorldAction>,

    /// Deterministic RNG.
    pub rng: GameRng,
}

impl World {
    /// Create an empty world with an all-floor map.
    #[must_use]
    pub fn new(width: i32, height: i32, seed: u64) -> Self {
        Self::with_map(Map::new(width, height), seed)
    }

    /// Create an empty world on an existing map.
    #[must_use]
    pub fn with_map(map: Map, seed: u64) -> Self {
        Self {
            slots: Vec::new(),
            occupancy: FxHashMap::default(),
            player: None,
            map,
            messages: Vec::new(),
            world_actions: Vec::new(),
            rng: GameRng::new(seed),
        }
    }

    // === Directory ===

    fn slot_index(id: ActorId) -> Option<usize> {
        (id.0 as usize).checked_sub(1)
    }

    /// Resolve an ID to a live actor.
    ///
    /// Returns `None` for removed actors and IDs never handed out.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        match self.slots.get(Self::slot_index(id)?)? {
            Slot::Live(actor) => Some(actor),
            Slot::Removed => None,
        }
    }

    /// Resolve an ID to a mutable live actor.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        match self.slots.get_mut(Self::slot_index(id)?)? {
            Slot::Live(actor) => Some(actor),
            Slot::Removed => None,
        }
    }

    /// Resolve an optional ID.
    #[must_use]
    pub fn resolve(&self, id: Option<ActorId>) -> Option<&Actor> {
        id.and_then(|id| self.actor(id))
    }

    /// Check if an ID resolves to a live actor.
    #[must_use]
    pub fn contains(&self, id: ActorId) -> bool {
        self.actor(id).is_some()
    }

    /// Check if an ID belonged to an actor that has since been removed.
    #[must_use]
    pub fn was_removed(&self, id: ActorId) -> bool {
        Self::slot_index(id)
            .and_then(|i| self.slots.get(i))
            .is_some_and(|slot| matches!(slot, Slot::Removed))
    }

    /// Iterate over live actors in ID order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Live(actor) => Some(actor),
            Slot::Removed => None,
        })
    }

    /// Number of live actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors().count()
    }

    /// The player actor, if present.
    #[must_use]
    pub fn player(&self) -> Option<&Actor> {
        self.resolve(self.player)
    }

    /// The player's ID, even if the player has since been removed.
    #[must_use]
    pub fn player_id(&self) -> Option<ActorId> {
        self.player
    }

    /// Actor standing on a cell.
    #[must_use]
    pub fn actor_at(&self, pos: Coord) -> Option<ActorId> {
        self.occupancy.get(&pos).copied()
    }

    /// IDs of every live actor summoned by `owner`.
    pub fn summons_of(&self, owner: ActorId) -> impl Iterator<Item = ActorId> + '_ {
        self.actors()
            .filter(move |a| a.summoner == Some(owner))
            .map(|a| a.id)
    }

    // === Placement ===

    /// Check if an actor could be placed on a cell.
    #[must_use]
    pub fn is_free(&self, pos: Coord) -> bool {
        self.map.is_passable(pos) && !self.occupancy.contains_key(&pos)
    }

    fn check_free(&self, pos: Coord) -> WorldResult<()> {
        if !self.map.in_bounds(pos) {
            return Err(WorldError::OutOfBounds(pos));
        }
        if !self.map.is_passable(pos) {
            return Err(WorldError::Impassable(pos));
        }
        if let Some(occupant) = self.actor_at(pos) {
            return Err(WorldError::Occupied { pos, occupant });
        }
        Ok(())
    }

    /// Find a free cell as close to `center` as possible.
    ///
    /// Searches ring by ring up to `radius` and picks randomly among the
    /// free cells of the nearest non-empty ring.
    pub fn find_free_near(&mut self, center: Coord, radius: i32) -> Option<Coord> {
        (0..=radius.max(0)).find_map(|r| {
            let free: Vec<Coord> = center.ring(r).filter(|&c| self.is_free(c)).collect();
            self.rng.choose(&free).copied()
        })
    }

    /// Pick any free cell on the map.
    pub fn random_free_cell(&mut self) -> Option<Coord> {
        let free: Vec<Coord> = self.map.coords().filter(|&c| self.is_free(c)).collect();
        self.rng.choose(&free).copied()
    }

    fn insert(&mut self, mut actor: Actor) -> ActorId {
        let id = ActorId(self.slots.len() as u32 + 1);
        actor.id = id;
        self.occupancy.insert(actor.position, id);
        self.slots.push(Slot::Live(actor));
        id
    }

    /// Create an actor from a template at an exact position.
    pub fn spawn(&mut self, template: &GenerationTemplate, pos: Coord) -> WorldResult<ActorId> {
        self.check_free(pos)?;
        let actor = Actor {
            id: ActorId(0),
            name: template.name.clone(),
            species: template.species,
            kind: ActorKind::Monster,
            faction: template.faction,
            hp: template.max_hp,
            max_hp: template.max_hp,
            position: pos,
            experience_level: template.experience_level,
            stationary: template.stationary,
            bleeds: template.bleeds,
            summoner: template.summoner,
            summon_duration: template.summon_duration,
            revives: 0,
            foe: template.foe,
            transformed_from: None,
            statuses: FxHashMap::default(),
            blame: Vec::new(),
        };
        Ok(self.insert(actor))
    }

    /// Create an actor from a template on the nearest free cell.
    pub fn spawn_near(
        &mut self,
        template: &GenerationTemplate,
        center: Coord,
        radius: i32,
    ) -> WorldResult<ActorId> {
        let pos = self
            .find_free_near(center, radius)
            .ok_or(WorldError::NoRoom { center, radius })?;
        self.spawn(template, pos)
    }

    /// Create the player.
    pub fn spawn_player(
        &mut self,
        name: impl Into<String>,
        max_hp: i32,
        pos: Coord,
    ) -> WorldResult<ActorId> {
        let template = GenerationTemplate::new(name, SpeciesId::new(0), max_hp)
            .with_faction(Faction::Friendly);
        let id = self.spawn(&template, pos)?;
        if let Some(player) = self.actor_mut(id) {
            player.kind = ActorKind::Player;
        }
        self.player = Some(id);
        Ok(id)
    }

    /// Remove an actor, leaving a tombstone.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let index = Self::slot_index(id)?;
        let slot = self.slots.get_mut(index)?;
        let Slot::Live(actor) = std::mem::replace(slot, Slot::Removed) else {
            return None;
        };
        if self.occupancy.get(&actor.position) == Some(&id) {
            self.occupancy.remove(&actor.position);
        }
        Some(actor)
    }

    /// Move an actor to a free cell.
    pub fn move_actor(&mut self, id: ActorId, to: Coord) -> WorldResult<()> {
        let from = self.actor(id).ok_or(WorldError::ActorNotFound(id))?.position;
        if from == to {
            return Ok(());
        }
        self.check_free(to)?;

        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        if let Some(actor) = self.actor_mut(id) {
            actor.position = to;
        }
        Ok(())
    }

    // === Damage ===

    /// Apply damage. Actors reduced to 0 hp or less are removed.
    pub fn hurt(&mut self, target: ActorId, hit: Hit) -> WorldResult<HurtOutcome> {
        let actor = self.actor_mut(target).ok_or(WorldError::ActorNotFound(target))?;
        actor.hp = actor.hp.saturating_sub(hit.amount.max(0));

        let credited = if hit.attributed { hit.source } else { None };
        if let Some(source) = credited.filter(|&s| s != target) {
            actor.foe = Some(source);
        }

        if actor.is_alive() {
            return Ok(HurtOutcome::Wounded { remaining: actor.hp });
        }

        let dead = self.remove(target).ok_or(WorldError::ActorNotFound(target))?;
        Ok(HurtOutcome::Killed(Corpse {
            id: dead.id,
            name: dead.name,
            species: dead.species,
            position: dead.position,
            bleeds: dead.bleeds,
            killer: credited,
        }))
    }

    // === Decorations ===

    /// Spill blood of a species onto a cell.
    pub fn bleed(&mut self, pos: Coord, species: SpeciesId, amount: u32) -> WorldResult<()> {
        let cell = self.map.cell_mut(pos).ok_or(WorldError::OutOfBounds(pos))?;
        if cell.passable && amount > 0 {
            cell.blood = cell.blood.saturating_add(amount);
            cell.blood_species = Some(species);
        }
        Ok(())
    }

    // === Messages ===

    /// Emit a user-facing message.
    pub fn message(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    /// Messages emitted so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Take all messages (empties the log).
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    // === World Actions ===

    /// Record a world action and apply it to every actor present.
    pub fn apply_world_action(&mut self, action: WorldAction) {
        self.world_actions.push(action);
        for slot in &mut self.slots {
            if let Slot::Live(actor) = slot {
                apply_to_actor(action, actor);
            }
        }
    }

    /// World actions applied so far, oldest first.
    #[must_use]
    pub fn world_actions(&self) -> &[WorldAction] {
        &self.world_actions
    }

    // === Snapshots ===

    /// Capture the world for saving.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            slots: self.slots.clone(),
            player: self.player,
            map: self.map.clone(),
            messages: self.messages.clone(),
            world_actions: self.world_actions.clone(),
            rng: self.rng.state(),
        }
    }

    /// Rebuild a world from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Self {
        let occupancy = snapshot
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Live(actor) => Some((actor.position, actor.id)),
                Slot::Removed => None,
            })
            .collect();

        Self {
            slots: snapshot.slots,
            occupancy,
            player: snapshot.player,
            map: snapshot.map,
            messages: snapshot.messages,
            world_actions: snapshot.world_actions,
            rng: GameRng::from_state(&snapshot.rng),
        }
    }
}

fn apply_to_actor(action: WorldAction, actor: &mut Actor) {
    match action {
        WorldAction::RevertTransformations => {
            // The player is reverted separately by whoever triggered this.
            if !actor.is_player() {
                if let Some(original) = actor.transformed_from.take() {
                    actor.species = original;
                }
            }
        }
        WorldAction::ClearFactionStatus { faction, status } => {
            if actor.is_aligned_with(faction) {
                actor.statuses.remove(&status);
            }
        }
    }
}

/// Serializable form of a [`World`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    slots: Vec<Slot>,
    player: Option<ActorId>,
    map: Map,
    messages: Vec<String>,
    world_actions: Vec<WorldAction>,
    rng: GameRngState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> GenerationTemplate {
        GenerationTemplate::new("goblin", SpeciesId(1), 10)
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut world = World::new(8, 8, 42);

        let a = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();
        let b = world.spawn(&goblin(), Coord::new(2, 1)).unwrap();
        world.remove(a);
        let c = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();

        assert_eq!(a, ActorId(1));
        assert_eq!(b, ActorId(2));
        assert_eq!(c, ActorId(3));
    }

    #[test]
    fn test_tombstone_never_resolves() {
        let mut world = World::new(8, 8, 42);
        let id = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();

        let removed = world.remove(id).unwrap();
        assert_eq!(removed.id, id);

        assert!(world.actor(id).is_none());
        assert!(world.was_removed(id));
        assert!(world.remove(id).is_none());
        assert!(world.actor_at(Coord::new(1, 1)).is_none());
    }

    #[test]
    fn test_unknown_ids() {
        let world = World::new(8, 8, 42);

        assert!(world.actor(ActorId(0)).is_none());
        assert!(world.actor(ActorId(99)).is_none());
        assert!(!world.was_removed(ActorId(99)));
        assert!(world.resolve(None).is_none());
    }

    #[test]
    fn test_spawn_rejects_blocked_cells() {
        let mut world = World::new(4, 4, 42);
        let first = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();
        world.map.set_wall(Coord::new(2, 2));

        assert_eq!(
            world.spawn(&goblin(), Coord::new(1, 1)),
            Err(WorldError::Occupied {
                pos: Coord::new(1, 1),
                occupant: first,
            })
        );
        assert_eq!(
            world.spawn(&goblin(), Coord::new(2, 2)),
            Err(WorldError::Impassable(Coord::new(2, 2)))
        );
        assert_eq!(
            world.spawn(&goblin(), Coord::new(9, 0)),
            Err(WorldError::OutOfBounds(Coord::new(9, 0)))
        );
    }

    #[test]
    fn test_move_updates_occupancy() {
        let mut world = World::new(8, 8, 42);
        let id = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();

        world.move_actor(id, Coord::new(3, 3)).unwrap();

        assert_eq!(world.actor(id).unwrap().position, Coord::new(3, 3));
        assert_eq!(world.actor_at(Coord::new(3, 3)), Some(id));
        assert!(world.is_free(Coord::new(1, 1)));
    }

    #[test]
    fn test_hurt_and_kill() {
        let mut world = World::new(8, 8, 42);
        let player = world.spawn_player("you", 20, Coord::new(0, 0)).unwrap();
        let id = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();

        let outcome = world.hurt(id, Hit::from(Some(player), 4)).unwrap();
        assert_eq!(outcome, HurtOutcome::Wounded { remaining: 6 });
        assert_eq!(world.actor(id).unwrap().foe, Some(player));

        let outcome = world.hurt(id, Hit::from(Some(player), 6)).unwrap();
        match outcome {
            HurtOutcome::Killed(corpse) => {
                assert_eq!(corpse.id, id);
                assert_eq!(corpse.killer, Some(player));
                assert_eq!(corpse.position, Coord::new(1, 1));
            }
            other => panic!("Expected Killed, got {:?}", other),
        }
        assert!(world.was_removed(id));
    }

    #[test]
    fn test_unattributed_hit_has_no_killer() {
        let mut world = World::new(8, 8, 42);
        let id = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();

        let outcome = world.hurt(id, Hit::unattributed(50)).unwrap();
        assert!(matches!(outcome, HurtOutcome::Killed(Corpse { killer: None, .. })));
    }

    #[test]
    fn test_hurt_missing_actor() {
        let mut world = World::new(8, 8, 42);
        assert_eq!(
            world.hurt(ActorId(5), Hit::unattributed(1)),
            Err(WorldError::ActorNotFound(ActorId(5)))
        );
    }

    #[test]
    fn test_find_free_near_prefers_center() {
        let mut world = World::new(8, 8, 42);
        let center = Coord::new(4, 4);

        assert_eq!(world.find_free_near(center, 2), Some(center));

        world.spawn(&goblin(), center).unwrap();
        let found = world.find_free_near(center, 2).unwrap();
        assert!(found.is_adjacent(center));
    }

    #[test]
    fn test_find_free_near_gives_up() {
        let mut world = World::new(1, 1, 42);
        world.spawn(&goblin(), Coord::new(0, 0)).unwrap();

        assert_eq!(world.find_free_near(Coord::new(0, 0), 3), None);
        assert_eq!(world.random_free_cell(), None);
    }

    #[test]
    fn test_bleed() {
        let mut world = World::new(8, 8, 42);
        world.bleed(Coord::new(3, 4), SpeciesId(7), 2).unwrap();
        world.bleed(Coord::new(3, 4), SpeciesId(7), 3).unwrap();

        let cell = world.map.cell(Coord::new(3, 4)).unwrap();
        assert_eq!(cell.blood, 5);
        assert_eq!(cell.blood_species, Some(SpeciesId(7)));

        assert!(world.bleed(Coord::new(-1, 0), SpeciesId(7), 1).is_err());
    }

    #[test]
    fn test_world_action_reverts_monsters_only() {
        let mut world = World::new(8, 8, 42);
        let player = world.spawn_player("you", 20, Coord::new(0, 0)).unwrap();
        let hog = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();

        world.actor_mut(player).unwrap().transformed_from = Some(SpeciesId(0));
        world.actor_mut(hog).unwrap().transformed_from = Some(SpeciesId(30));

        world.apply_world_action(WorldAction::RevertTransformations);

        assert_eq!(world.actor(hog).unwrap().species, SpeciesId(30));
        assert!(world.actor(hog).unwrap().transformed_from.is_none());
        assert!(world.actor(player).unwrap().transformed_from.is_some());
        assert_eq!(world.world_actions(), &[WorldAction::RevertTransformations]);
    }

    #[test]
    fn test_world_action_clears_faction_status() {
        let mut world = World::new(8, 8, 42);
        let ally = world
            .spawn(&goblin().with_faction(Faction::Friendly), Coord::new(1, 1))
            .unwrap();
        let foe = world.spawn(&goblin(), Coord::new(2, 2)).unwrap();
        world.actor_mut(ally).unwrap().apply_status(Status::Slowed, 5);
        world.actor_mut(foe).unwrap().apply_status(Status::Slowed, 5);

        world.apply_world_action(WorldAction::ClearFactionStatus {
            faction: Faction::Friendly,
            status: Status::Slowed,
        });

        assert!(!world.actor(ally).unwrap().has_status(Status::Slowed));
        assert!(world.actor(foe).unwrap().has_status(Status::Slowed));
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_tombstones() {
        let mut world = World::new(8, 8, 42);
        let a = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();
        let b = world.spawn(&goblin(), Coord::new(2, 2)).unwrap();
        world.remove(a);
        world.message("hello");

        let restored = World::from_snapshot(world.snapshot());

        assert!(restored.was_removed(a));
        assert_eq!(restored.actor_at(Coord::new(2, 2)), Some(b));
        assert_eq!(restored.messages(), &["hello".to_string()]);
    }

    #[test]
    fn test_take_messages_empties_log() {
        let mut world = World::new(8, 8, 42);
        world.message("one");
        world.message("two");

        assert_eq!(world.take_messages(), vec!["one".to_string(), "two".to_string()]);
        assert!(world.messages().is_empty());
        assert!(world.take_messages().is_empty());
    }

    #[test]
    fn test_hurt_saturates_below_zero() {
        let mut world = World::new(8, 8, 42);
        let id = world.spawn(&goblin(), Coord::new(1, 1)).unwrap();
        world.actor_mut(id).unwrap().hp = -10;

        let outcome = world.hurt(id, Hit::unattributed(i32::MAX)).unwrap();

        assert!(matches!(outcome, HurtOutcome::Killed(_)));
        assert!(world.was_removed(id));
    }
}
