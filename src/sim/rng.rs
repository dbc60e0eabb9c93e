//! Random sources for spawn and obstacle-variant decisions
//!
//! Seeded runs use the 32-bit LCG below so a seed plus a flap timeline is
//! enough to rebuild a run. Unseeded play falls back to host randomness.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A uniform sample source in `[0, 1]`
pub trait RandomSource {
    fn next(&mut self) -> f64;
}

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Seeded linear congruential generator.
///
/// `state = (1664525 * state + 1013904223) mod 2^32`, output `state / 0xFFFFFFFF`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for Lcg {
    fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state as f64 / u32::MAX as f64
    }
}

/// Unseeded fallback backed by host entropy
#[derive(Debug, Clone)]
pub struct HostRandom {
    rng: Pcg32,
}

impl HostRandom {
    pub fn new() -> Self {
        Self {
            rng: Pcg32::from_rng(&mut rand::rng()),
        }
    }
}

impl Default for HostRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for HostRandom {
    fn next(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Cycles through a fixed list of samples (QA and tests)
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Uniform sample in `[min, max]` drawn from `rng`
#[inline]
pub fn random_range(rng: &mut dyn RandomSource, min: f32, max: f32) -> f32 {
    min + rng.next() as f32 * (max - min)
}
