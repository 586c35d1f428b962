//! Fallback message selection
//!
//! The fallback responder picks one of a few apologies. Production picks
//! uniformly at random; tests inject a fixed or seeded selector.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses an index in `0..len`
pub trait MessageSelector: Send + Sync {
    /// `len` is never zero
    fn select(&self, len: usize) -> usize;
}

/// Uniform choice from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl MessageSelector for RandomSelector {
    fn select(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Always the same index, clamped to the last one
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector(pub usize);

impl MessageSelector for FixedSelector {
    fn select(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// Reproducible sequence from a seed
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl MessageSelector for SeededSelector {
    fn select(&self, len: usize) -> usize {
        self.rng.lock().gen_range(0..len.max(1))
    }
}
