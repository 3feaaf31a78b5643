use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::engine::RandomSource;

/// Боевой RNG: thread_rng.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut rand::thread_rng());
    }
}

/// Детерминированный RNG для тестов и симуляций.
/// Одинаковый seed – одинаковые колоды.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Случайное число в диапазоне `0..upper` (для ботов и свипов в тестах).
    pub fn below(&mut self, upper: u64) -> u64 {
        use rand::Rng;
        if upper == 0 {
            return 0;
        }
        self.inner.gen_range(0..upper)
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}
