//! Deterministic random number generation for effect resolution.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Serializable**: O(1) state capture and restore at save points
//! - **Combat helpers**: dice rolls and randomly rounded division
//!
//! ```
//! use deferred_effects::core::{Dice, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let total = rng.roll(Dice::new(3, 6));
//! assert!((3..=18).contains(&total));
//!
//! // Same seed, same rolls
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.gen_range(0..100), b.gen_range(0..100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG for world mutation.
///
/// Uses ChaCha8 for speed while keeping reproducible sequences across
/// platforms.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Generate a random integer in the given range.
    ///
    /// Returns `range.start` when the range is empty.
    pub fn gen_range(&mut self, range: std::ops::Range<i32>) -> i32 {
        if range.is_empty() {
            return range.start;
        }
        self.inner.gen_range(range)
    }

    /// Generate a random boolean with given probability of true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Sum of `dice.count` rolls of a `dice.sides`-sided die.
    ///
    /// Zero-sided dice always roll 0. Totals saturate at `i32::MAX`.
    pub fn roll(&mut self, dice: Dice) -> i32 {
        if dice.sides == 0 {
            return 0;
        }
        (0..dice.count)
            .map(|_| i32::try_from(self.inner.gen_range(1..=dice.sides)).unwrap_or(i32::MAX))
            .fold(0, i32::saturating_add)
    }

    /// Divide, rounding the remainder up with probability `remainder / divisor`.
    ///
    /// ```
    /// use deferred_effects::core::GameRng;
    ///
    /// let mut rng = GameRng::new(1);
    /// assert_eq!(rng.div_rand_round(24, 12), 2);
    /// let q = rng.div_rand_round(18, 12);
    /// assert!(q == 1 || q == 2);
    /// ```
    pub fn div_rand_round(&mut self, value: i32, divisor: i32) -> i32 {
        if divisor <= 0 || value <= 0 {
            return 0;
        }
        let quotient = value / divisor;
        let remainder = value % divisor;
        if remainder > 0 && self.inner.gen_range(0..divisor) < remainder {
            quotient + 1
        } else {
            quotient
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// A dice expression: `count` d `sides`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dice {
    pub count: u32,
    pub sides: u32,
}

impl Dice {
    /// Create a dice expression.
    #[must_use]
    pub const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    /// Highest possible roll.
    #[must_use]
    pub const fn max(self) -> i32 {
        let total = self.count.saturating_mul(self.sides);
        if total > i32::MAX as u32 {
            i32::MAX
        } else {
            total as i32
        }
    }
}

impl std::fmt::Display for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
