//! The single injected source of randomness.
//!
//! Generation, population, combat, AI and NPC scheduling all draw from one
//! `&mut dyn RandomSource`. Seeding it makes a run repeatable within a build;
//! replay across versions is not promised.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..bound`; zero when `bound` is zero.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }

    /// Uniform value in `[min, max]` inclusive.
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (max - min) as u32 + 1;
        min + self.below(span) as i32
    }

    /// Uniform float in `[0, 1]`.
    fn unit(&mut self) -> f32 {
        self.next_u32() as f32 / u32::MAX as f32
    }

    fn coin(&mut self) -> bool {
        self.next_u32() & 1 == 0
    }
}

/// Production source backed by `rand`'s standard generator.
#[derive(Clone, Debug)]
pub struct SimRng {
    inner: StdRng,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.inner.gen_range(0..bound)
    }

    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    fn unit(&mut self) -> f32 {
        self.inner.gen_range(0.0..=1.0)
    }
}

/// Replays a fixed cycle of raw draws. Intended for tests that need to force outcomes.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always draws the same value.
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
