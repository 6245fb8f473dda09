//! Seeded random stream with deterministic, forkable sub-streams.
//!
//! One `RandomSource` is created per run and threaded explicitly through
//! construction; there is no process-global generator. The propose phase
//! hands every carrier its own fork, keyed by (tick, carrier id), so
//! concurrent draws need no locking and a run replays identically no
//! matter how the parallel map distributes work.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A seeded uniform random-number stream.
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Create the run's root stream from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent stream for the given stream id.
    ///
    /// Forks with the same (seed, stream id) always produce the same
    /// draws, independent of how many draws the root stream has made.
    pub fn fork(&self, stream: u64) -> RandomSource {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(stream);
        RandomSource { seed: self.seed, rng }
    }

    /// Uniform draw in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform index in [0, n). `n` must be non-zero.
    pub fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Bernoulli draw: true with probability `p`.
    ///
    /// `p >= 1.0` always succeeds, so a Metropolis acceptance of exactly
    /// 1 never depends on a float comparison against a fresh draw.
    pub fn chance(&mut self, p: f64) -> bool {
        if p >= 1.0 {
            return true;
        }
        self.rng.gen::<f64>() < p
    }

    /// Raw 64-bit draw.
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource").field("seed", &self.seed).finish()
    }
}
