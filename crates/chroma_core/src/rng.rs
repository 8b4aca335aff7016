//! # Random Sources
//!
//! Every random decision in the workspace goes through [`RandomSource`] so
//! that selection logic stays deterministic and testable. Production code
//! uses [`SeededSource`] (ChaCha8); tests script exact outcomes with
//! [`ScriptedSource`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pluggable entropy provider.
///
/// The only primitive is a uniform float draw over `[min, max)`; integer
/// picks derive from it so every implementation behaves identically.
pub trait RandomSource {
    /// Returns a uniformly distributed float in `[min, max)`.
    ///
    /// Returns `min` when the range is empty (`max <= min`).
    fn next_float(&mut self, min: f32, max: f32) -> f32;

    /// Returns a uniformly distributed index in `[0, len)`.
    ///
    /// `len` must be non-zero; a zero `len` is a programmer error and yields 0.
    fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "next_index requires a non-empty range");
        if len == 0 {
            return 0;
        }
        let raw = self.next_float(0.0, len as f32).floor() as usize;
        raw.min(len - 1)
    }
}

/// Deterministic production source backed by ChaCha8.
///
/// Same seed = same decisions, ALWAYS.
pub struct SeededSource {
    /// Internal ChaCha8 state.
    rng: ChaCha8Rng,
}

impl SeededSource {
    /// Creates a source from a 64-bit seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_float(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }
}

/// Test source replaying a fixed script of unit-interval fractions.
///
/// Each scripted value `v` in `[0, 1)` maps a `next_float(min, max)` call to
/// `min + v * (max - min)`. The script cycles when exhausted, so a short
/// script can drive an arbitrarily long run.
pub struct ScriptedSource {
    /// Scripted fractions in `[0, 1)`.
    script: Vec<f32>,
    /// Next script position.
    cursor: usize,
}

impl ScriptedSource {
    /// Creates a source from unit-interval fractions.
    #[must_use]
    pub fn new(script: Vec<f32>) -> Self {
        Self { script, cursor: 0 }
    }

    /// A source that always draws the lowest value of any range.
    #[must_use]
    pub fn zeroes() -> Self {
        Self::new(vec![0.0])
    }
}

impl RandomSource for ScriptedSource {
    fn next_float(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        let fraction = if self.script.is_empty() {
            0.0
        } else {
            let value = self.script[self.cursor % self.script.len()];
            self.cursor = self.cursor.wrapping_add(1);
            value
        };
        (max - min).mul_add(fraction, min)
    }
}
