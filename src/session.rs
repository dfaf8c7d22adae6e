//! A combat session: one world, its effect queue, and the turn-loop hook.
//!
//! ## Serialization Boundaries
//!
//! Pending effects are never saved. A snapshot is only taken between
//! ticks, once `end_tick` has drained everything; asking for one while
//! effects are pending is an error rather than a silent loss.
//!
//! ```
//! use deferred_effects::core::{Coord, EffectConfig, SpeciesId, World};
//! use deferred_effects::effects::BloodPool;
//! use deferred_effects::rules::StandardRules;
//! use deferred_effects::session::CombatSession;
//!
//! let mut session = CombatSession::new(World::new(8, 8, 42), StandardRules::default(), EffectConfig::default());
//!
//! let (_, queue) = session.parts_mut();
//! BloodPool::schedule_at(queue, SpeciesId::new(1), Coord::new(2, 2), 3);
//! assert!(session.snapshot().is_err());
//!
//! session.end_tick();
//! let bytes = session.snapshot().unwrap();
//! let restored = CombatSession::restore(&bytes, StandardRules::default()).unwrap();
//! assert_eq!(restored.world().map.blood_at(Coord::new(2, 2)), 3);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{EffectConfig, World, WorldSnapshot};
use crate::queue::{DrainReport, EffectQueue};
use crate::rules::{CombatRules, StandardRules};

/// Failure to save or load a session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("cannot snapshot with {0} final effects pending")]
    PendingEffects(usize),

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Result type for session save/load.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Serialize, Deserialize)]
struct SessionSnapshot {
    world: WorldSnapshot,
    config: EffectConfig,
    tick: u64,
}

/// World, effect queue, rules and configuration for one game.
pub struct CombatSession<R: CombatRules = StandardRules> {
    world: World,
    effects: EffectQueue,
    rules: R,
    config: EffectConfig,
    tick: u64,
}

impl<R: CombatRules> CombatSession<R> {
    /// Start a session on an existing world.
    pub fn new(world: World, rules: R, config: EffectConfig) -> Self {
        Self {
            world,
            effects: EffectQueue::new(),
            rules,
            config,
            tick: 0,
        }
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The pending effects.
    #[must_use]
    pub fn effects(&self) -> &EffectQueue {
        &self.effects
    }

    /// World and queue together, for combat code that schedules effects
    /// while looking at actors.
    pub fn parts_mut(&mut self) -> (&mut World, &mut EffectQueue) {
        (&mut self.world, &mut self.effects)
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Ticks completed so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Finish the current tick: drain the final effects once.
    ///
    /// Effects scheduled during the drain stay queued for the next tick.
    pub fn end_tick(&mut self) -> DrainReport {
        let report = self
            .effects
            .fire_final_effects(&mut self.world, &self.rules, &self.config);
        self.tick += 1;
        debug!(tick = self.tick, fired = report.fired, deferred = report.deferred, "tick ended");
        report
    }

    /// Serialize the session. Fails while effects are pending.
    pub fn snapshot(&self) -> SessionResult<Vec<u8>> {
        if !self.effects.is_empty() {
            return Err(SessionError::PendingEffects(self.effects.len()));
        }
        let snapshot = SessionSnapshot {
            world: self.world.snapshot(),
            config: self.config.clone(),
            tick: self.tick,
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Rebuild a session from [`CombatSession::snapshot`] output.
    pub fn restore(bytes: &[u8], rules: R) -> SessionResult<Self> {
        let snapshot: SessionSnapshot = bincode::deserialize(bytes)?;
        info!(tick = snapshot.tick, "session restored");
        Ok(Self {
            world: World::from_snapshot(snapshot.world),
            effects: EffectQueue::new(),
            rules,
            config: snapshot.config,
            tick: snapshot.tick,
        })
    }
}
