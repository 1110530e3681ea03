//! Random source used by the mock data generators
//!
//! Generators never touch a global RNG. Production code passes a seeded
//! [`StdRng`]; tests can pass [`ScriptedRandom`] to replay exact draws.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[low, low + span)`
    fn next_in(&mut self, low: u32, span: u32) -> u32 {
        low + (self.next_f64() * f64::from(span)).floor() as u32
    }

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Build the generator RNG, reproducible when a seed is configured
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    position: usize,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, position: 0 }
    }

    /// Always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.position % self.draws.len()];
        self.position += 1;
        draw
    }
}
