//! `JitterSource` implementations backed by `rand`.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::ports::random_port::JitterSource;

fn draw<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    // gen_range panics on an empty range
    if low < high {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Reproducible draws for a fixed seed (`[feed] seed` / `--seed`).
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for SeededJitter {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        draw(&mut self.rng, low, high)
    }
}

/// Fresh entropy on every run.
pub struct ThreadJitter {
    rng: ThreadRng,
}

impl ThreadJitter {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for ThreadJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterSource for ThreadJitter {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        draw(&mut self.rng, low, high)
    }
}

/// Seeded when a seed is configured, otherwise thread-local entropy.
pub fn jitter_for(seed: Option<u64>) -> Box<dyn JitterSource> {
    match seed {
        Some(seed) => Box::new(SeededJitter::new(seed)),
        None => Box::new(ThreadJitter::new()),
    }
}
