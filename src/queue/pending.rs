//! The pending effect queue.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{EffectConfig, World};
use crate::effects::{FinalEffect, FireContext};
use crate::rules::CombatRules;

/// Where a scheduled effect ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheduled {
    /// Appended as a new entry at this slot.
    Queued(usize),
    /// Folded into the existing entry at this slot.
    Merged(usize),
}

impl Scheduled {
    /// Queue slot holding the effect.
    #[must_use]
    pub fn slot(self) -> usize {
        match self {
            Scheduled::Queued(slot) | Scheduled::Merged(slot) => slot,
        }
    }

    /// Check if the effect was merged into an earlier one.
    #[must_use]
    pub fn is_merged(self) -> bool {
        matches!(self, Scheduled::Merged(_))
    }
}

/// Result of one drain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    /// Effects fired by this drain.
    pub fired: usize,
    /// Effects scheduled while firing, waiting for the next drain.
    pub deferred: usize,
}

impl DrainReport {
    /// Check if the drain did nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fired == 0 && self.deferred == 0
    }
}

/// Final effects waiting for the end of the tick.
///
/// ## Behavior
///
/// - `schedule()`: Merges into the first compatible entry, else appends
/// - `fire_final_effects()`: Takes every pending entry and fires them in
///   insertion order; anything scheduled meanwhile waits for the next call
/// - `clear()`: Drops all pending entries unfired
#[derive(Clone, Debug, Default)]
pub struct EffectQueue {
    pending: Vec<FinalEffect>,
}

impl EffectQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pending effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending effects in firing order.
    #[must_use]
    pub fn pending(&self) -> &[FinalEffect] {
        &self.pending
    }

    /// Queue an effect, merging it into an earlier compatible one if any.
    pub fn schedule(&mut self, effect: impl Into<FinalEffect>) -> Scheduled {
        let effect = effect.into();
        let kind = effect.kind();

        if let Some(slot) = self.pending.iter().position(|e| e.mergeable(&effect)) {
            self.pending[slot].merge(effect);
            trace!(effect = %kind, slot, "merged final effect");
            return Scheduled::Merged(slot);
        }

        self.pending.push(effect);
        let slot = self.pending.len() - 1;
        trace!(effect = %kind, slot, "scheduled final effect");
        Scheduled::Queued(slot)
    }

    /// Fire every pending effect, in order.
    ///
    /// The queue is emptied before the first effect fires. Effects that
    /// schedule further effects put them in the emptied queue, so they fire
    /// on the next drain rather than this one.
    pub fn fire_final_effects(
        &mut self,
        world: &mut World,
        rules: &dyn CombatRules,
        config: &EffectConfig,
    ) -> DrainReport {
        if self.pending.is_empty() {
            return DrainReport::default();
        }

        let batch = std::mem::take(&mut self.pending);
        let fired = batch.len();
        debug!(count = fired, "firing final effects");

        let mut ctx = FireContext::new(world, self, rules, config);
        for effect in batch {
            trace!(effect = %effect.kind(), "firing final effect");
            effect.fire(&mut ctx);
        }

        let deferred = self.pending.len();
        if deferred > 0 {
            debug!(count = deferred, "final effects left for next drain");
        }
        DrainReport { fired, deferred }
    }

    /// Drop every pending effect without firing it.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
