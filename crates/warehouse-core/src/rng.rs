//! Random sources used by every probabilistic rule.
//!
//! The engine never touches `rand` directly: all draws go through
//! [`RandomSource`], so a seeded generator gives reproducible games and a
//! [`ScriptedSource`] lets tests force individual outcomes.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Source of the three kinds of draws the rules need.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[lo, hi]`, both inclusive.
    fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64;

    /// `amount` distinct indices from `0..len`, without replacement.
    /// Never returns more than `len` indices.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;

    /// Bernoulli trial succeeding with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn unit(&mut self) -> f64 {
        (**self).unit()
    }

    fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        (**self).int_inclusive(lo, hi)
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        (**self).sample_indices(len, amount)
    }
}

/// Deterministic ChaCha8 generator seeded from a `u64`.
#[derive(Clone, Debug)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        if amount == 0 {
            return Vec::new();
        }
        index::sample(&mut self.rng, len, amount).into_vec()
    }
}

/// Replays queued draws, then falls back to fixed answers.
///
/// Fallbacks: `unit` returns `fallback_unit` (0.999 by default, so every
/// ordinary chance fails), `int_inclusive` returns 0 clamped into range, and
/// `sample_indices` returns the first `amount` indices.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    units: VecDeque<f64>,
    ints: VecDeque<i64>,
    samples: VecDeque<Vec<usize>>,
    fallback_unit: f64,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self {
            units: VecDeque::new(),
            ints: VecDeque::new(),
            samples: VecDeque::new(),
            fallback_unit: 0.999,
        }
    }
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source whose every `unit` draw is `value`.
    pub fn constant(value: f64) -> Self {
        Self {
            fallback_unit: value,
            ..Self::default()
        }
    }

    pub fn with_units<I: IntoIterator<Item = f64>>(mut self, units: I) -> Self {
        self.units.extend(units);
        self
    }

    pub fn with_ints<I: IntoIterator<Item = i64>>(mut self, ints: I) -> Self {
        self.ints.extend(ints);
        self
    }

    pub fn with_samples<I: IntoIterator<Item = Vec<usize>>>(mut self, samples: I) -> Self {
        self.samples.extend(samples);
        self
    }

    pub fn push_unit(&mut self, value: f64) {
        self.units.push_back(value);
    }

    pub fn push_int(&mut self, value: i64) {
        self.ints.push_back(value);
    }

    /// Number of queued `unit` draws not consumed yet.
    pub fn pending_units(&self) -> usize {
        self.units.len()
    }
}

impl RandomSource for ScriptedSource {
    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(self.fallback_unit)
    }

    fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        let v = self.ints.pop_front().unwrap_or(0);
        v.clamp(lo, hi.max(lo))
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        match self.samples.pop_front() {
            Some(mut picked) => {
                let mut seen = Vec::with_capacity(picked.len());
                picked.retain(|&i| {
                    let keep = i < len && !seen.contains(&i);
                    seen.push(i);
                    keep
                });
                picked.truncate(amount);
                picked
            }
            None => (0..amount).collect(),
        }
    }
}
