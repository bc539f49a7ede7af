use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of randomness for draws and synthetic players.
///
/// Every random decision in the crate goes through this trait so a seeded or
/// scripted source makes the whole pipeline reproducible.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[min, max]`. Returns `min` when `min >= max`.
    fn int_inclusive(&mut self, min: i64, max: i64) -> i64;

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.int_inclusive(0, len as i64 - 1) as usize)
    }
}

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for RngState {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn int_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}
