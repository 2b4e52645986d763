//! Random draw abstraction used by the generator

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random reals.
///
/// The generator only ever asks for `uniform(low, high)`, so swapping the
/// implementation is enough to make a run fully deterministic.
pub trait RandomSource {
    /// Uniform real in `[low, high)`. Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Uniform real in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        self.uniform(0.0, 1.0)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }
}

/// [`RandomSource`] backed by `rand`'s standard generator.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Reproducible source for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high.is_nan() || low.is_nan() || high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

/// Replays a fixed list of unit draws, scaled into the requested range.
///
/// Each queued value `u` in `[0, 1)` yields `low + u * (high - low)`. When the
/// queue runs dry the fallback value is used for every further draw.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    draws: VecDeque<f64>,
    fallback: f64,
}

impl SequenceRandom {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0.0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Source that returns the same unit draw forever.
    pub fn constant(value: f64) -> Self {
        Self::new([]).with_fallback(value)
    }
}

impl RandomSource for SequenceRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let u = self.draws.pop_front().unwrap_or(self.fallback);
        if high.is_nan() || low.is_nan() || high <= low {
            return low;
        }
        low + u * (high - low)
    }
}
